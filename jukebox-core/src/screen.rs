//! Presentation state shared with the display

use crate::link::Stage;

/// What the display should currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenState {
    /// No host linked; show the waiting page
    #[default]
    WaitingConnection,
    /// Link up; show live telemetry
    ShowStats,
    /// Reserved for a dedicated link error page
    ErrorScreen,
    /// Reserved
    Unknown,
}

impl ScreenState {
    /// Screen state implied by a link stage
    pub fn for_stage(stage: Stage) -> Self {
        if stage.is_linked() {
            ScreenState::ShowStats
        } else {
            ScreenState::WaitingConnection
        }
    }

    /// Whether telemetry should be drawn
    pub fn shows_stats(&self) -> bool {
        matches!(self, ScreenState::ShowStats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_waiting() {
        assert_eq!(ScreenState::default(), ScreenState::WaitingConnection);
    }

    #[test]
    fn test_for_stage() {
        assert_eq!(
            ScreenState::for_stage(Stage::TransmitReady),
            ScreenState::ShowStats
        );
        for stage in [
            Stage::ErrorWait,
            Stage::GreetHost,
            Stage::GreetDevice,
            Stage::LinkConfirmHost,
            Stage::LinkConfirmDevice,
        ] {
            assert_eq!(ScreenState::for_stage(stage), ScreenState::WaitingConnection);
        }
    }

    #[test]
    fn test_shows_stats() {
        assert!(ScreenState::ShowStats.shows_stats());
        assert!(!ScreenState::ErrorScreen.shows_stats());
    }
}
