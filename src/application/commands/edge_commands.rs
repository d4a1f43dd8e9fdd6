//! Edge Function Commands

use serde_json::Value;

use crate::application::ports::EdgeFunction;

/// 透传调用一个 edge function
#[derive(Debug, Clone)]
pub struct InvokeEdgeFunction {
    pub function: EdgeFunction,
    pub payload: Value,
}
