//! Command parser for the interactive session.

use leadgen_core::results::WebsiteFilter;

/// Default search radius in kilometers, matching the backend default.
pub const DEFAULT_RADIUS_KM: u32 = 10;
/// Default maximum number of results per search.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search {
        query: String,
        location: String,
        radius_km: u32,
        max_results: u32,
    },
    FilterWebsite(WebsiteFilter),
    FilterRating(f64),
    FilterClear,
    Next,
    Prev,
    Show,
    Export { path: Option<String> },
    Research { business_id: u64 },
    Seo { business_id: u64 },
    Issues { business_id: u64 },
    Usage,
    Stats,
    Health,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for blank lines; `Err` carries a usage
/// message ready to print.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = split_first_word(line);
    let command = match word.to_lowercase().as_str() {
        "search" => parse_search(rest)?,
        "filter" => parse_filter(rest)?,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "show" | "page" => Command::Show,
        "export" => Command::Export {
            path: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "research" => Command::Research {
            business_id: parse_id(rest, "research <business-id>")?,
        },
        "seo" => Command::Seo {
            business_id: parse_id(rest, "seo <business-id>")?,
        },
        "issues" => Command::Issues {
            business_id: parse_id(rest, "issues <business-id>")?,
        },
        "usage" => Command::Usage,
        "stats" => Command::Stats,
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{other}', try 'help'")),
    };

    Ok(Some(command))
}

fn split_first_word(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim_start()),
        None => (line, ""),
    }
}

/// `search <query> @ <location> [radius_km] [max_results]`
///
/// The location may contain spaces; up to two trailing numeric tokens are
/// read as radius and max results. At least one token is always kept as the
/// location, so a purely numeric location like a postal code still works.
fn parse_search(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: search <query> @ <location> [radius_km] [max_results]";

    let (query, location_part) = rest.split_once('@').ok_or(USAGE)?;
    let query = query.trim();
    if query.is_empty() {
        return Err(USAGE.to_string());
    }

    let mut tokens: Vec<&str> = location_part.split_whitespace().collect();
    let mut numbers: Vec<u32> = Vec::new();
    while numbers.len() < 2 && tokens.len() > 1 {
        match tokens.last().and_then(|t| t.parse::<u32>().ok()) {
            Some(n) => {
                numbers.push(n);
                tokens.pop();
            }
            None => break,
        }
    }
    numbers.reverse();

    let location = tokens.join(" ");
    if location.is_empty() {
        return Err(USAGE.to_string());
    }

    let (radius_km, max_results) = match numbers.as_slice() {
        [] => (DEFAULT_RADIUS_KM, DEFAULT_MAX_RESULTS),
        [radius] => (*radius, DEFAULT_MAX_RESULTS),
        [radius, max] => (*radius, *max),
        _ => unreachable!(),
    };

    Ok(Command::Search {
        query: query.to_string(),
        location,
        radius_km,
        max_results,
    })
}

/// `filter website any|yes|no` / `filter rating <min>` / `filter clear`
fn parse_filter(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: filter website any|yes|no | filter rating <min> | filter clear";

    let (kind, value) = split_first_word(rest);
    match kind.to_lowercase().as_str() {
        "website" => {
            let filter = match value.to_lowercase().as_str() {
                "any" => WebsiteFilter::Any,
                "yes" | "with" => WebsiteFilter::WithWebsite,
                "no" | "without" => WebsiteFilter::WithoutWebsite,
                _ => return Err(USAGE.to_string()),
            };
            Ok(Command::FilterWebsite(filter))
        }
        "rating" => {
            let min: f64 = value.parse().map_err(|_| USAGE.to_string())?;
            if !(0.0..=5.0).contains(&min) {
                return Err("Minimum rating must be between 0 and 5".to_string());
            }
            Ok(Command::FilterRating(min))
        }
        "clear" => Ok(Command::FilterClear),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_id(rest: &str, usage: &str) -> Result<u64, String> {
    rest.trim()
        .parse()
        .map_err(|_| format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_defaults() {
        let cmd = parse("search coffee shop @ Seattle").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "coffee shop".to_string(),
                location: "Seattle".to_string(),
                radius_km: DEFAULT_RADIUS_KM,
                max_results: DEFAULT_MAX_RESULTS,
            }
        );
    }

    #[test]
    fn test_parse_search_with_numbers_and_spanning_location() {
        let cmd = parse("search dentists @ Cape Town, South Africa 25 50")
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "dentists".to_string(),
                location: "Cape Town, South Africa".to_string(),
                radius_km: 25,
                max_results: 50,
            }
        );
    }

    #[test]
    fn test_parse_search_single_number_is_radius() {
        let cmd = parse("search bakery @ Portland 5").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "bakery".to_string(),
                location: "Portland".to_string(),
                radius_km: 5,
                max_results: DEFAULT_MAX_RESULTS,
            }
        );
    }

    #[test]
    fn test_parse_search_numeric_location() {
        // A postal code is a location, not a radius
        let cmd = parse("search pizza @ 10001").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "pizza".to_string(),
                location: "10001".to_string(),
                radius_km: DEFAULT_RADIUS_KM,
                max_results: DEFAULT_MAX_RESULTS,
            }
        );

        let cmd = parse("search pizza @ 10001 5").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "pizza".to_string(),
                location: "10001".to_string(),
                radius_km: 5,
                max_results: DEFAULT_MAX_RESULTS,
            }
        );
    }

    #[test]
    fn test_parse_search_requires_location() {
        assert!(parse("search coffee shop").is_err());
        assert!(parse("search @ Seattle").is_err());
        assert!(parse("search coffee @").is_err());
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            parse("filter website yes").unwrap().unwrap(),
            Command::FilterWebsite(WebsiteFilter::WithWebsite)
        );
        assert_eq!(
            parse("filter website no").unwrap().unwrap(),
            Command::FilterWebsite(WebsiteFilter::WithoutWebsite)
        );
        assert_eq!(
            parse("filter rating 4.5").unwrap().unwrap(),
            Command::FilterRating(4.5)
        );
        assert_eq!(parse("filter clear").unwrap().unwrap(), Command::FilterClear);
        assert!(parse("filter rating 7").is_err());
        assert!(parse("filter website maybe").is_err());
    }

    #[test]
    fn test_parse_detail_commands() {
        assert_eq!(
            parse("research 12").unwrap().unwrap(),
            Command::Research { business_id: 12 }
        );
        assert_eq!(parse("seo 3").unwrap().unwrap(), Command::Seo { business_id: 3 });
        assert!(parse("research twelve").is_err());
        assert!(parse("issues").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("next").unwrap().unwrap(), Command::Next);
        assert_eq!(parse("  ").unwrap(), None);
        assert_eq!(
            parse("export /tmp/out.csv").unwrap().unwrap(),
            Command::Export {
                path: Some("/tmp/out.csv".to_string())
            }
        );
        assert_eq!(parse("export").unwrap().unwrap(), Command::Export { path: None });
        assert!(parse("frobnicate").is_err());
    }
}
