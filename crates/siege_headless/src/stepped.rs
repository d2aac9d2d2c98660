//! Deterministic runner: time only moves when the controller says so.
//!
//! Ticks advance on `tick` requests and accrual periods fire on `elapse`
//! requests, so a recorded session replays to the same state hash.

use std::io::{BufRead, Write};
use std::time::Duration;

use siege_core::simulation::Simulation;

use crate::error::HeadlessError;
use crate::protocol::{Request, Response};

/// Stepped headless runner owning one simulation.
#[derive(Debug, Clone, Default)]
pub struct SteppedRunner {
    sim: Simulation,
}

impl SteppedRunner {
    /// Wrap an existing simulation.
    pub fn new(sim: Simulation) -> Self {
        Self { sim }
    }

    /// The driven simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Consume the runner, returning the simulation.
    pub fn into_simulation(self) -> Simulation {
        self.sim
    }

    /// Handle one request.
    ///
    /// Rejections become [`Response::Error`]; the simulation is unchanged.
    pub fn handle(&mut self, request: &Request) -> Response {
        match self.try_handle(request) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(cmd = request.name(), error = %err, "Request rejected");
                Response::error(err.kind(), err.to_string())
            }
        }
    }

    fn try_handle(&mut self, request: &Request) -> Result<Response, HeadlessError> {
        if let Some(command) = request.to_command()? {
            return Ok(self.sim.apply(command)?.into());
        }

        let response = match *request {
            Request::Tick { count } => {
                let mut attacks = 0;
                let mut destroyed = Vec::new();
                for _ in 0..count {
                    let events = self.sim.tick();
                    attacks += events.attacks.len();
                    destroyed.extend(events.destroyed_structures);
                }
                Response::Ticked {
                    tick: self.sim.get_tick(),
                    attacks,
                    destroyed,
                }
            }
            Request::Elapse { ms } => {
                let report = self.sim.advance_clock(Duration::from_millis(ms));
                Response::Accrued {
                    gold: report.gold,
                    elixir: report.elixir,
                }
            }
            Request::Query => Response::State {
                snapshot: self.sim.snapshot(),
            },
            Request::Hash => Response::Hash {
                tick: self.sim.get_tick(),
                hash: self.sim.state_hash(),
            },
            Request::Quit => Response::Bye,
            _ => {
                return Err(HeadlessError::Unsupported {
                    mode: "stepped",
                    cmd: request.name(),
                })
            }
        };
        Ok(response)
    }

    /// Serve a JSON-lines session until `quit` or end of input.
    ///
    /// Writes the ready line first and flushes after every response.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), HeadlessError> {
        write_line(&mut output, &Response::ready(self.sim.get_tick()))?;
        tracing::info!("Stepped session started");

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match Request::from_json(line) {
                Ok(request) => self.handle(&request),
                Err(err) => {
                    let err = HeadlessError::from(err);
                    tracing::warn!(error = %err, "Unparseable request");
                    Response::error(err.kind(), err.to_string())
                }
            };
            write_line(&mut output, &response)?;

            if response == Response::Bye {
                tracing::info!(tick = self.sim.get_tick(), "Session ended by controller");
                return Ok(());
            }
        }

        tracing::info!(tick = self.sim.get_tick(), "Input closed");
        Ok(())
    }
}

fn write_line<W: Write>(output: &mut W, response: &Response) -> Result<(), HeadlessError> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()?;
    Ok(())
}
