use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let dsn = |matches: &clap::ArgMatches| -> Result<String> {
        matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))
    };

    match matches.subcommand() {
        Some(("seed", sub_matches)) => Ok(Action::Seed {
            dsn: dsn(sub_matches)?,
        }),
        _ => Ok(Action::Server {
            port: matches.get_one::<u16>("port").copied().unwrap_or(3000),
            dsn: dsn(matches)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_server() {
        let matches = commands::new().get_matches_from(vec![
            "farmstand",
            "--port",
            "4000",
            "--dsn",
            "postgres://localhost:5432/farmstand",
        ]);

        match handler(&matches) {
            Ok(Action::Server { port, dsn }) => {
                assert_eq!(port, 4000);
                assert_eq!(dsn, "postgres://localhost:5432/farmstand");
            }
            other => panic!("expected server action, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_seed() {
        let matches = commands::new().get_matches_from(vec![
            "farmstand",
            "--dsn",
            "postgres://localhost:5432/farmstand",
            "seed",
        ]);

        match handler(&matches) {
            Ok(Action::Seed { dsn }) => {
                assert_eq!(dsn, "postgres://localhost:5432/farmstand");
            }
            other => panic!("expected seed action, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_missing_dsn() {
        let matches = commands::new().get_matches_from(vec!["farmstand"]);
        assert!(handler(&matches).is_err());
    }
}
