use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub fn two_paths<I>(
    args: I,
    usage: &str,
    defaults: (PathBuf, PathBuf),
) -> Result<(PathBuf, PathBuf)>
where
    I: IntoIterator<Item = String>,
{
    let args = args
        .into_iter()
        .filter(|arg| !arg.trim().is_empty())
        .collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Err(anyhow!("usage: {usage}"));
    }
    match args.as_slice() {
        [] => Ok(defaults),
        [first, second] => Ok((PathBuf::from(first), PathBuf::from(second))),
        _ => Err(anyhow!(
            "expected 2 positional arguments, got {}\nusage: {usage}",
            args.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::two_paths;

    fn defaults() -> (PathBuf, PathBuf) {
        (PathBuf::from("data/raw"), PathBuf::from("data/parquet"))
    }

    fn owned(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_paths_override_defaults() {
        let (a, b) = two_paths(owned(&["in", "out"]), "x <a> <b>", defaults())
            .expect("two paths should parse");
        assert_eq!(a, PathBuf::from("in"));
        assert_eq!(b, PathBuf::from("out"));
    }

    #[test]
    fn no_args_falls_back_to_defaults() {
        let paths = two_paths(owned(&[]), "x", defaults()).expect("no args should parse");
        assert_eq!(paths, defaults());
    }

    #[test]
    fn wrong_count_or_help_is_usage_error() {
        assert!(two_paths(owned(&["only"]), "x", defaults()).is_err());
        assert!(two_paths(owned(&["a", "b", "c"]), "x", defaults()).is_err());
        let err = two_paths(owned(&["--help"]), "x <a> <b>", defaults()).unwrap_err();
        assert!(err.to_string().contains("usage: x <a> <b>"));
    }
}
