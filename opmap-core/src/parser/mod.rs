use crate::error::{MapError, ParseError};
use crate::types::OperationsMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedMap {
    pub map: OperationsMap,
    pub format: MapFormat,
}

pub fn parse_map_str(input: &str, format: MapFormat) -> Result<ParsedMap, ParseError> {
    match format {
        MapFormat::Json => Ok(ParsedMap {
            map: serde_json::from_str::<OperationsMap>(input)?,
            format,
        }),
        MapFormat::Yaml => Ok(ParsedMap {
            map: serde_yaml::from_str::<OperationsMap>(input)?,
            format,
        }),
        MapFormat::Auto => parse_map_auto(input),
    }
}

/// Parse (auto-detecting the format) and validate in one step.
pub fn load_map_str(input: &str) -> Result<OperationsMap, MapError> {
    let parsed = parse_map_str(input, MapFormat::Auto)?;
    parsed.map.validate()?;
    Ok(parsed.map)
}

fn parse_map_auto(input: &str) -> Result<ParsedMap, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::UnknownFormat);
    }

    // JSON always starts with `{` after trimming; it is also valid YAML, so try it first.
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<OperationsMap>(input) {
            Ok(map) => Ok(ParsedMap {
                map,
                format: MapFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<OperationsMap>(input) {
                Ok(map) => Ok(ParsedMap {
                    map,
                    format: MapFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<OperationsMap>(input) {
        Ok(map) => Ok(ParsedMap {
            map,
            format: MapFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(map) = serde_json::from_str::<OperationsMap>(input) {
                return Ok(ParsedMap {
                    map,
                    format: MapFormat::Json,
                });
            }
            Err(ParseError::Yaml(e))
        }
    }
}
