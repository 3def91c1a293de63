use anyhow::{Context, Result, anyhow, bail};

/// One scripted map interaction for `simulate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Pan gesture ending at (lat, lon).
    Pan { lat: f64, lon: f64 },
    /// Zoom gesture ending at the given level.
    Zoom(u8),
    /// Idle time in milliseconds.
    Wait(u64),
    /// Drop the cached nationwide snapshot.
    Refresh,
}

/// Parse `pan LAT LON; zoom Z; wait MS; refresh` (separated by `;` or newlines).
pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_step(s).with_context(|| format!("Invalid step `{s}`")))
        .collect()
}

fn parse_step(step: &str) -> Result<Step> {
    let mut words = step.split_whitespace();
    let verb = words.next().ok_or_else(|| anyhow!("empty step"))?;
    let args: Vec<&str> = words.collect();

    let parsed = match (verb.to_lowercase().as_str(), args.as_slice()) {
        ("pan", [lat, lon]) => {
            let lat: f64 = lat.parse().context("latitude is not a number")?;
            let lon: f64 = lon.parse().context("longitude is not a number")?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("coordinate ({lat}, {lon}) is out of range");
            }
            Step::Pan { lat, lon }
        }
        ("zoom", [level]) => Step::Zoom(level.parse().context("zoom must be 0-255")?),
        ("wait", [ms]) => Step::Wait(ms.parse().context("wait takes milliseconds")?),
        ("refresh", []) => Step::Refresh,
        (other, _) => bail!(
            "unknown or malformed step `{other}`; expected `pan LAT LON`, `zoom Z`, `wait MS` \
             or `refresh`"
        ),
    };

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators() {
        let steps = parse_script("pan 35.681 139.767; zoom 14\nwait 500; refresh;")
            .expect("valid script");
        assert_eq!(
            steps,
            vec![
                Step::Pan {
                    lat: 35.681,
                    lon: 139.767,
                },
                Step::Zoom(14),
                Step::Wait(500),
                Step::Refresh,
            ]
        );
    }

    #[test]
    fn rejects_bad_steps() {
        let err = parse_script("pan 35.0").unwrap_err();
        assert!(format!("{err:#}").contains("Invalid step `pan 35.0`"));

        let err = parse_script("zoom -1").unwrap_err();
        assert!(format!("{err:#}").contains("zoom must be"));

        let err = parse_script("pan 100 0").unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));

        assert!(parse_script("fly 1 2").is_err());
        assert!(parse_script("refresh now").is_err());
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse_script(" ; \n").expect("blank is fine").is_empty());
    }
}
