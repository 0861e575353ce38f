use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOGGER_CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    if let Err(e) = log4rs::init_file(LOGGER_CONFIG_FILE, Default::default()) {
        init_console_fallback();
        log::warn!("Could not load '{}', logging to console: {}", LOGGER_CONFIG_FILE, e);
    }
}

fn create_console_fallback_config() -> Result<Config, ConfigErrors> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {l} {t} - {m}{n}")))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Warn))
}

fn init_console_fallback() {
    match create_console_fallback_config() {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Failed to install console logger: {}", e);
            }
        }
        Err(e) => eprintln!("Invalid console logger configuration: {}", e),
    }
}

pub fn log_field(name: &str, offset: u64, bytes: &[u8]) {
    fn get_byte_array(bytes: &[u8]) -> Vec<String> {
        bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
    }
    log::trace!("{:>4} {:<24} {:?}", offset, name, get_byte_array(bytes));
}

#[cfg(test)]
mod test {
    use super::create_console_fallback_config;

    #[test]
    fn console_fallback_config_is_valid() {
        let config = create_console_fallback_config().unwrap();
        assert_eq!(config.appenders().len(), 1);
        assert_eq!(config.root().level(), log::LevelFilter::Warn);
    }
}
