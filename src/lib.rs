//! Real-time grammar and spelling assistance service.
//!
//! Text arrives over a WebSocket session or a REST call and is fanned out to
//! independent analyzers: dictionary spelling suggestions, a rule-engine
//! grammar corrector with supplementary question rules, and a
//! part-of-speech driven structural rewriter.  An optional LLM-backed tone
//! report is served alongside.

pub mod config;
pub mod grammar;
pub mod server;
pub mod session;
pub mod spell;
pub mod text;
pub mod tone;
