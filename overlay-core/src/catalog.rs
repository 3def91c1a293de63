use std::collections::HashSet;

use crate::error::CatalogError;
use crate::model::RegionPoint;

const fn region(
    id: u8,
    label: &'static str,
    city: &'static str,
    lat: f64,
    lon: f64,
) -> RegionPoint {
    RegionPoint {
        id,
        label,
        city,
        lat,
        lon,
    }
}

/// Prefectural capitals, in JIS prefecture-code order.
const PREFECTURAL_CAPITALS: &[RegionPoint] = &[
    region(1, "北海道", "札幌", 43.063968, 141.347899),
    region(2, "青森", "青森", 40.824623, 140.740593),
    region(3, "岩手", "盛岡", 39.703531, 141.152667),
    region(4, "宮城", "仙台", 38.268839, 140.872103),
    region(5, "秋田", "秋田", 39.7186, 140.102334),
    region(6, "山形", "山形", 38.240437, 140.363634),
    region(7, "福島", "福島", 37.750299, 140.467521),
    region(8, "茨城", "水戸", 36.341813, 140.446793),
    region(9, "栃木", "宇都宮", 36.565725, 139.883565),
    region(10, "群馬", "前橋", 36.391208, 139.060156),
    region(11, "埼玉", "さいたま", 35.857428, 139.648933),
    region(12, "千葉", "千葉", 35.605058, 140.123308),
    region(13, "東京", "東京", 35.689521, 139.691704),
    region(14, "神奈川", "横浜", 35.447753, 139.642514),
    region(15, "新潟", "新潟", 37.902418, 139.023221),
    region(16, "富山", "富山", 36.69529, 137.211338),
    region(17, "石川", "金沢", 36.594682, 136.625573),
    region(18, "福井", "福井", 36.065219, 136.221642),
    region(19, "山梨", "甲府", 35.664158, 138.568449),
    region(20, "長野", "長野", 36.651289, 138.181224),
    region(21, "岐阜", "岐阜", 35.391227, 136.722291),
    region(22, "静岡", "静岡", 34.975562, 138.38276),
    region(23, "愛知", "名古屋", 35.180188, 136.906565),
    region(24, "三重", "津", 34.730283, 136.508591),
    region(25, "滋賀", "大津", 35.004531, 135.86859),
    region(26, "京都", "京都", 35.021004, 135.755607),
    region(27, "大阪", "大阪", 34.686316, 135.519711),
    region(28, "兵庫", "神戸", 34.691279, 135.183025),
    region(29, "奈良", "奈良", 34.685333, 135.832744),
    region(30, "和歌山", "和歌山", 34.226034, 135.167506),
    region(31, "鳥取", "鳥取", 35.503869, 134.237672),
    region(32, "島根", "松江", 35.472324, 133.05052),
    region(33, "岡山", "岡山", 34.661772, 133.934675),
    region(34, "広島", "広島", 34.39656, 132.459622),
    region(35, "山口", "山口", 34.185956, 131.471374),
    region(36, "徳島", "徳島", 34.07027, 134.554844),
    region(37, "香川", "高松", 34.340149, 134.043444),
    region(38, "愛媛", "松山", 33.84166, 132.765362),
    region(39, "高知", "高知", 33.559706, 133.53108),
    region(40, "福岡", "福岡", 33.590355, 130.401716),
    region(41, "佐賀", "佐賀", 33.249367, 130.298822),
    region(42, "長崎", "長崎", 32.744839, 129.873756),
    region(43, "熊本", "熊本", 32.7898, 130.741667),
    region(44, "大分", "大分", 33.238194, 131.612591),
    region(45, "宮崎", "宮崎", 31.91109, 131.423855),
    region(46, "鹿児島", "鹿児島", 31.560178, 130.558146),
    region(47, "沖縄", "那覇", 26.212401, 127.680932),
];

/// Ordered set of representative points for the nationwide layer.
///
/// Order is significant: batch fetches are issued in catalog order.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    points: Vec<RegionPoint>,
}

impl RegionCatalog {
    pub fn new(points: Vec<RegionPoint>) -> Result<Self, CatalogError> {
        if points.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id));
            }
            if !p.coordinate().is_valid() {
                return Err(CatalogError::OutOfRange {
                    id: p.id,
                    lat: p.lat.to_string(),
                    lon: p.lon.to_string(),
                });
            }
        }

        Ok(Self { points })
    }

    /// The 47 Japanese prefectural capitals.
    pub fn japan() -> Self {
        Self {
            points: PREFECTURAL_CAPITALS.to_vec(),
        }
    }

    pub fn points(&self) -> &[RegionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn japan_catalog_is_valid() {
        let japan = RegionCatalog::japan();
        assert_eq!(japan.len(), 47);

        let rebuilt = RegionCatalog::new(japan.points().to_vec())
            .expect("built-in catalog must validate");
        assert_eq!(rebuilt.points(), japan.points());
    }

    #[test]
    fn catalog_keeps_order() {
        let japan = RegionCatalog::japan();
        assert_eq!(japan.points()[0].city, "札幌");
        assert_eq!(japan.points()[46].city, "那覇");
        let tokyo = japan.points()[12];
        assert_eq!((tokyo.id, tokyo.city), (13, "東京"));
        assert_eq!(tokyo.coordinate(), Coordinate::new(35.689521, 139.691704));
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let a = region(1, "A", "a", 10.0, 10.0);
        let err = RegionCatalog::new(vec![a, a]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(1));

        assert_eq!(RegionCatalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn rejects_out_of_range_points() {
        let bad = region(9, "X", "x", 123.0, 10.0);
        let err = RegionCatalog::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("out-of-range"));
    }
}
