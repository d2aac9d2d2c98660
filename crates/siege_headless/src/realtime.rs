//! Real-time JSON-lines session on top of [`EngineHandle`].
//!
//! Time is driven by the engine's own timers, so `tick` and `elapse`
//! requests are refused.

use siege_core::simulation::Simulation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::engine::EngineHandle;
use crate::error::HeadlessError;
use crate::protocol::{Request, Response};

/// Serve a session until `quit` or end of input, then stop the engine.
///
/// Returns the final simulation.
pub async fn run_session<R, W>(
    engine: EngineHandle,
    input: R,
    mut output: W,
) -> Result<Simulation, HeadlessError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tick, _) = engine.hash().await?;
    write_line(&mut output, &Response::ready(tick)).await?;
    tracing::info!("Real-time session started");

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match Request::from_json(line) {
            Ok(request) => handle(&engine, &request).await,
            Err(err) => Err(err.into()),
        };
        let response = response.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Request rejected");
            Response::error(err.kind(), err.to_string())
        });
        write_line(&mut output, &response).await?;

        if response == Response::Bye {
            break;
        }
    }

    engine.shutdown().await
}

async fn handle(engine: &EngineHandle, request: &Request) -> Result<Response, HeadlessError> {
    if let Some(command) = request.to_command()? {
        return Ok(engine.apply(command).await?.into());
    }

    match request {
        Request::Query => Ok(Response::State {
            snapshot: engine.snapshot(),
        }),
        Request::Hash => {
            let (tick, hash) = engine.hash().await?;
            Ok(Response::Hash { tick, hash })
        }
        Request::Quit => Ok(Response::Bye),
        _ => Err(HeadlessError::Unsupported {
            mode: "real-time",
            cmd: request.name(),
        }),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(
    output: &mut W,
    response: &Response,
) -> Result<(), HeadlessError> {
    output.write_all(response.to_json_line().as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn session(input: &str) -> (Simulation, Vec<serde_json::Value>) {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        let mut output = Vec::new();
        let sim = run_session(engine, input.as_bytes(), &mut output)
            .await
            .unwrap();
        let lines = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (sim, lines)
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_and_refused_time_control() {
        let (sim, lines) = session(
            r#"{"cmd":"train","unit":"archer"}
{"cmd":"tick","count":5}
{"cmd":"elapse","ms":2000}
{"cmd":"query"}
{"cmd":"quit"}
"#,
        )
        .await;

        assert_eq!(lines[0]["type"], "ready");
        assert_eq!(lines[1]["type"], "trained");
        assert_eq!(lines[2]["kind"], "unsupported");
        assert_eq!(lines[3]["kind"], "unsupported");
        assert_eq!(lines[4]["elixir"], 925);
        assert_eq!(lines[5]["type"], "bye");
        assert_eq!(sim.player().troops, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_of_input_stops_engine() {
        let (sim, lines) = session("{\"cmd\":\"toggle_attack\"}\n").await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["enabled"], true);
        assert!(sim.player().attack_mode);
    }
}
