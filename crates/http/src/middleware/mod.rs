//! Middleware components for HTTP request processing

pub mod idle_gate;

pub use idle_gate::{
    GateInput, GateOutcome, GateState, SessionLookup, SignInRedirect, evaluate, force_sign_out,
    idle_gate_middleware, is_secure,
};
