// Request interceptors
// Each either forwards to the next layer or short-circuits with a response

pub mod access;
pub mod route_params;
