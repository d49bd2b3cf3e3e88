// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `vista` - probe a device and replay or watch adaptive quality sessions.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vista_infra::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new(std::alloc::System);

#[derive(Parser)]
#[command(name = "vista")]
#[command(about = "Adaptive render-quality controller")]
#[command(version)]
struct Cli {
    /// Default log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the graphics device and print the initial quality tier
    Probe {
        /// User-agent string used for mobile detection
        #[arg(long)]
        user_agent: Option<String>,

        /// Print the capability record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a synthetic frame trace through the optimizer
    Simulate(commands::simulate::SimulateArgs),

    /// Run a live session on the background service
    Watch {
        /// Optimizer configuration (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Session length in seconds
        #[arg(short, long, default_value_t = 10)]
        seconds: u64,

        /// Target frame time of the paced render loop
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    vista_telemetry::logging::init(&cli.log);

    match cli.command {
        Commands::Probe { user_agent, json } => commands::probe::run(user_agent, json),
        Commands::Simulate(args) => commands::simulate::run(&args),
        Commands::Watch {
            config,
            seconds,
            frame_ms,
        } => commands::watch::run(config.as_deref(), seconds, frame_ms),
    }
}
