pub mod gate;
pub mod logging;
pub mod session;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

pub const ARG_PORT: &str = "port";
pub const ARG_PUBLIC_DIR: &str = "public-dir";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("passgate")
        .about("Password-gated content server")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("3000")
                .env("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_PUBLIC_DIR)
                .long(ARG_PUBLIC_DIR)
                .help("Directory served as static files")
                .default_value("public")
                .env("PUBLIC_DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        );

    let command = gate::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 9] = [
        "PORT",
        "PUBLIC_DIR",
        "ADMIN_PASS",
        "ADMIN_PASS_FILE",
        "PASSGATE_CONTENT_FILE",
        "SESSION_SECRET",
        "PASSGATE_SESSION_TTL",
        "PASSGATE_COOKIE_SECURE",
        "PASSGATE_LOG_LEVEL",
    ];

    fn clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(ENV_VARS.map(|var| (var, None::<&str>)), f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "passgate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Password-gated content server".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        clean_env(|| {
            let matches = new().get_matches_from(vec!["passgate"]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
            assert_eq!(
                matches.get_one::<PathBuf>(ARG_PUBLIC_DIR),
                Some(&PathBuf::from("public"))
            );
            assert_eq!(
                matches.get_one::<u64>(session::ARG_SESSION_TTL).copied(),
                Some(3600)
            );
            assert!(!matches.get_flag(session::ARG_COOKIE_SECURE));
            assert!(matches.get_one::<String>(gate::ARG_ADMIN_PASS).is_none());
            assert!(matches.get_one::<String>(session::ARG_SESSION_SECRET).is_none());
        });
    }

    #[test]
    fn test_check_args() {
        clean_env(|| {
            let matches = new().get_matches_from(vec![
                "passgate",
                "--port",
                "8080",
                "--public-dir",
                "/srv/www",
                "--admin-pass",
                "letmein123",
                "--admin-pass-file",
                "/run/secrets/custom",
                "--session-secret",
                "signing",
                "--session-ttl",
                "60",
                "--cookie-secure",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<PathBuf>(ARG_PUBLIC_DIR),
                Some(&PathBuf::from("/srv/www"))
            );
            assert_eq!(
                matches.get_one::<String>(gate::ARG_ADMIN_PASS).map(String::as_str),
                Some("letmein123")
            );
            assert_eq!(
                matches.get_one::<PathBuf>(gate::ARG_ADMIN_PASS_FILE),
                Some(&PathBuf::from("/run/secrets/custom"))
            );
            assert_eq!(
                matches.get_one::<u64>(session::ARG_SESSION_TTL).copied(),
                Some(60)
            );
            assert!(matches.get_flag(session::ARG_COOKIE_SECURE));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORT", Some("443")),
                ("PUBLIC_DIR", Some("/srv/www")),
                ("ADMIN_PASS", Some("letmein123")),
                ("ADMIN_PASS_FILE", None),
                ("PASSGATE_CONTENT_FILE", Some("/srv/admin.html")),
                ("SESSION_SECRET", Some("signing")),
                ("PASSGATE_SESSION_TTL", Some("120")),
                ("PASSGATE_COOKIE_SECURE", Some("true")),
                ("PASSGATE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["passgate"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(gate::ARG_ADMIN_PASS).map(String::as_str),
                    Some("letmein123")
                );
                assert_eq!(
                    matches.get_one::<PathBuf>(gate::ARG_CONTENT_FILE),
                    Some(&PathBuf::from("/srv/admin.html"))
                );
                assert_eq!(
                    matches
                        .get_one::<String>(session::ARG_SESSION_SECRET)
                        .map(String::as_str),
                    Some("signing")
                );
                assert_eq!(
                    matches.get_one::<u64>(session::ARG_SESSION_TTL).copied(),
                    Some(120)
                );
                assert!(matches.get_flag(session::ARG_COOKIE_SECURE));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("PASSGATE_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["passgate"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("PASSGATE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["passgate".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
