//! Begin / poll / stop capture protocol as a typestate
//!
//! ```text
//! Idle ──begin(type)──► Listening(type) ──stop──► Idle
//!                          │   ▲
//!                          └───┘ poll
//! ```
//!
//! Only one session may listen at a time. Nothing enforces this, a second
//! session arming the core simply takes over the poller.

use crate::bridge::{InputType, NativeBridge};
use crate::param_package::ParamPackage;
use statum::{machine, state};
use std::sync::Arc;
use tracing::{debug, info};

#[state]
#[derive(Debug, Clone)]
pub enum CaptureState {
    Idle,
    Listening(InputType),
}

#[machine]
pub struct MappingSession<S: CaptureState> {
    bridge: Arc<dyn NativeBridge>,
}

impl MappingSession<Idle> {
    pub fn create(bridge: Arc<dyn NativeBridge>) -> Self {
        Self::new(bridge)
    }

    /// Arms the core for `input_type`
    pub fn begin(self, input_type: InputType) -> MappingSession<Listening> {
        info!("Listening for {:?} input", input_type);
        self.bridge.begin_mapping(input_type);
        self.transition_with(input_type)
    }
}

impl MappingSession<Listening> {
    pub fn input_type(&self) -> InputType {
        self.get_state_data().copied().unwrap_or_default()
    }

    /// Latest qualifying input, empty while nothing was seen
    pub fn poll(&self) -> ParamPackage {
        let candidate = ParamPackage::parse(&self.bridge.next_input());
        if !candidate.is_empty() {
            debug!("Polled candidate: {}", candidate);
        }
        candidate
    }

    pub fn stop(self) -> MappingSession<Idle> {
        info!("Stopped listening for {:?} input", self.input_type());
        self.bridge.stop_mapping();
        self.transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::loopback::{BridgeCall, LoopbackBridge};
    use crate::bridge::ButtonState;

    #[test]
    fn candidate_only_after_injected_event() {
        let bridge = Arc::new(LoopbackBridge::new());
        let session = MappingSession::create(bridge.clone()).begin(InputType::Button);
        assert_eq!(session.input_type(), InputType::Button);
        assert!(session.poll().is_empty());

        bridge.on_gamepad_button_event("abc", 2, 97, ButtonState::Pressed);
        let candidate = session.poll();
        assert_eq!(candidate.get("button", 0), 97);
        assert_eq!(candidate.get("port", 0), 2);

        let _idle = session.stop();
        assert_eq!(
            bridge.calls().first(),
            Some(&BridgeCall::BeginMapping(InputType::Button))
        );
        assert_eq!(bridge.calls().last(), Some(&BridgeCall::StopMapping));
    }
}
