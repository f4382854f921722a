use crate::events::AppEvent;
use async_channel::Sender;
use gyrio::TiltSample;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

const SOCKET_PATH: &str = "/tmp/tiltglass.sock";

/// Parses one line of the socket protocol. Anything that is not a
/// well-formed `tilt <x> <y>` or `center` is ignored, non-finite numbers
/// included.
fn parse_command(line: &str) -> Option<AppEvent> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "tilt" => {
            let x: f64 = parts.next()?.parse().ok()?;
            let y: f64 = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            let sample = TiltSample::new(x, y);
            sample.is_finite().then_some(AppEvent::Sample(sample))
        }
        "center" => parts
            .next()
            .is_none()
            .then_some(AppEvent::Sample(TiltSample::default())),
        _ => None,
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_command(line.trim()) {
                            let _ = tx.send(event).await;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tilt() {
        match parse_command("tilt 0.5 -0.25") {
            Some(AppEvent::Sample(s)) => assert_eq!(s, TiltSample::new(0.5, -0.25)),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_center() {
        match parse_command("center") {
            Some(AppEvent::Sample(s)) => assert_eq!(s, TiltSample::default()),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_non_matching_lines_ignored() {
        let lines = [
            "",
            "show",
            "tilt",
            "tilt 1",
            "tilt a b",
            "tilt 1 2 3",
            "tilt NaN 0",
            "tilt inf 0",
            "center now",
        ];
        for line in lines {
            assert!(parse_command(line).is_none(), "accepted {:?}", line);
        }
    }
}
