use crate::image::header::HeaderVersion;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_output_file_argument(command);
        Self::register_header_version_argument(command)
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_header_version_argument(command: Command) -> Command {
        command.arg(Self::create_header_version_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to BMP output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_header_version_argument() -> Arg {
        arg!(header_version: -v --header_version <VERSION> "Bitmap header version")
            .default_value("Info")
            .value_parser(value_parser!(HeaderVersion))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            output_file: Self::extract_output_file_argument(matches),
            header_version: Self::extract_header_version_argument(matches),
        }
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_header_version_argument(matches: &ArgMatches) -> HeaderVersion {
        matches
            .get_one::<HeaderVersion>("header_version")
            .expect("Header version must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}
