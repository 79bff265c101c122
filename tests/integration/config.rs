//! Configuration and logging wiring.

use crate::helpers::*;
use server_request::config::{parse_server_params, FactoryConfig, LoggingConfig};
use server_request::request::UploadLimits;
use server_request::{logging, Config, SimulatedServerRequestFactory};

/// Test factory built from configuration uses its defaults
#[test]
fn test_factory_from_config() {
    let config = FactoryConfig {
        default_server_params: parse_server_params("SERVER_NAME=cfg.test;SERVER_PORT=8000")
            .unwrap(),
        upload_limits: UploadLimits::default(),
    };
    let factory = SimulatedServerRequestFactory::from_config(&config);

    let req = factory.convert(get("/")).unwrap();
    assert_server_str(&req, "SERVER_NAME", "cfg.test");
    assert_server_int(&req, "SERVER_PORT", 8000);

    // URI scheme still wins over configured port
    let req = factory.convert(get("https://example.com/")).unwrap();
    assert_server_int(&req, "SERVER_PORT", 443);
}

/// Test logging initialization with the JSON formatter
#[test]
fn test_logging_init() {
    let config = Config {
        logging: LoggingConfig {
            filter: "server_request=debug".to_string(),
            service_name: "integration".to_string(),
        },
        ..Config::default()
    };

    logging::init(&config.logging).expect("Subscriber already set");
    config.log_summary();

    // Conversions emit debug events through the installed subscriber
    let req = convert(request("GET", "/?a=1", &[("Authorization", "Bearer t")], ""));
    assert_eq!(req.query_param("a"), Some("1"));
}
