/// Parses a comma separated list of folder keys like `2,5,1`.
pub(crate) fn parse_path(arg: &str) -> Result<Vec<u32>, String> {
    if arg.trim().is_empty() {
        return Ok(Vec::new());
    }
    arg.split(',')
        .map(|key| {
            key.trim()
                .parse::<u32>()
                .map_err(|_| format!("{:?} is not a valid folder key", key))
        })
        .collect()
}

pub(crate) fn parse_switch(arg: &str) -> Result<bool, String> {
    match arg.to_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => Err(format!("expected on or off, got {:?}", arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_paths() {
        assert_eq!(parse_path("2,5,1").unwrap(), vec![2, 5, 1]);
        assert_eq!(parse_path(" 3 ").unwrap(), vec![3]);
        assert!(parse_path("").unwrap().is_empty());
        assert!(parse_path("2,,1").is_err());
        assert!(parse_path("-1").is_err());
    }

    #[test]
    fn switches() {
        assert!(parse_switch("ON").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(parse_switch("maybe").is_err());
    }
}
