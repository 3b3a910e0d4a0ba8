pub mod domain;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod series;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_OUTPUT_DIR: &str = "data";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub input_path: Option<PathBuf>,
        pub output_dir: Option<PathBuf>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                input_path: non_empty_var("DASH_INPUT_PATH").map(PathBuf::from),
                output_dir: non_empty_var("DASH_OUTPUT_DIR").map(PathBuf::from),
            })
        }

        pub fn require_input_path(&self) -> anyhow::Result<&std::path::Path> {
            self.input_path
                .as_deref()
                .context("DASH_INPUT_PATH (or --input) is required")
        }

        pub fn output_dir_or_default(&self) -> PathBuf {
            self.output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
