//! HTTP/JSON server for the algorithm visualizer.
//!
//! Fetches practice problems and solutions from a generative model, asks it
//! for an execution trace of a solution on a user input, and drives one
//! animation player per browser session. Playback state lives here; the web
//! client only renders the frames it is handed.

pub mod config;
pub mod error;
pub mod handlers;
pub mod llm_provider;
pub mod model_json;
pub mod problem_analyzer;
pub mod router;
pub mod schema;
pub mod session;
pub mod solution_writer;
pub mod state;
pub mod topic_map;
pub mod trace_producer;
