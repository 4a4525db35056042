//! Web server command.

use console::style;

use crate::config::Settings;

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 3000;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind);

    println!(
        "{} Storing albums under {}",
        style("→").cyan(),
        settings.data_dir.display()
    );
    println!(
        "{} Starting albumfetch at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3000" -> 0.0.0.0:3000
/// - Just a host: "127.0.0.1" -> 127.0.0.1:3000
/// - Host and port: "127.0.0.1:8080"
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("0.0.0.0".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_forms() {
        assert_eq!(parse_bind_address("8080"), ("0.0.0.0".to_string(), 8080));
        assert_eq!(
            parse_bind_address("127.0.0.1:4000"),
            ("127.0.0.1".to_string(), 4000)
        );
        assert_eq!(
            parse_bind_address("localhost"),
            ("localhost".to_string(), DEFAULT_PORT)
        );
    }
}
