use clap::Parser;
use odata_elk::{DEFAULT_OFFSET, DEFAULT_TOP, QueryOptions, SELECT_ALL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about = "Translate an OData-style filter into a search query document")]
pub struct Cli {
    /// YAML file mapping `<scope>.<field>` to physical field names.
    #[clap(long, env = "ODATA_ELK_CONFIG")]
    pub config: PathBuf,
    /// Scope (index prefix) the field names are resolved in.
    #[clap(long, env = "ODATA_ELK_SCOPE")]
    pub scope: String,
    #[clap(long)]
    pub filter: String,
    /// Comma separated field names to return, or `*`.
    #[clap(long, default_value = SELECT_ALL)]
    pub select: String,
    #[clap(long, default_value_t = DEFAULT_TOP, allow_hyphen_values = true)]
    pub top: i64,
    #[clap(long, default_value_t = DEFAULT_OFFSET, allow_hyphen_values = true)]
    pub offset: i64,
    /// Accept unclosed groups and ignore trailing tokens.
    #[clap(long, default_value = "false")]
    pub lenient: bool,
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl Cli {
    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            select: self.select.clone(),
            top: self.top,
            offset: self.offset,
            lenient: self.lenient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::try_parse_from([
            "odata-elk",
            "--config",
            "fields.yaml",
            "--scope",
            "log_*",
            "--filter",
            "name eq 'x'",
        ])
        .unwrap();
        assert_eq!(cli.options(), QueryOptions::default());
        assert!(!cli.pretty);
    }

    #[test]
    fn negative_paging_values_are_accepted() {
        let cli = Cli::try_parse_from([
            "odata-elk",
            "--config",
            "f.yaml",
            "--scope",
            "s",
            "--filter",
            "a eq 1",
            "--top",
            "-1",
            "--offset",
            "-2",
            "--select",
            "a,b",
            "--lenient",
        ])
        .unwrap();
        let options = cli.options();
        assert_eq!(options.top, -1);
        assert_eq!(options.offset, -2);
        assert_eq!(options.select, "a,b");
        assert!(options.lenient);
    }
}
