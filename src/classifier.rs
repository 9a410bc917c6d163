use crate::config::Markers;
use crate::types::StateKind;

/// Result of checking one line for every marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub error: bool,
    pub state: Option<StateKind>,
}

/// Recognizes state and error markers in log lines.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    markers: Markers,
}

impl Classifier {
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    pub fn contains_error(&self, line: &str) -> bool {
        line.contains(&self.markers.error)
    }

    pub fn contains_on_state(&self, line: &str) -> bool {
        line.contains(&self.markers.on)
    }

    pub fn contains_off_state(&self, line: &str) -> bool {
        line.contains(&self.markers.off)
    }

    /// Error detection is independent of the state check. ON wins when a
    /// line carries both state markers.
    pub fn classify(&self, line: &str) -> Classification {
        let state = if self.contains_on_state(line) {
            Some(StateKind::On)
        } else if self.contains_off_state(line) {
            Some(StateKind::Off)
        } else {
            None
        };

        Classification {
            error: self.contains_error(line),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ON: &str = "Jul 11 16:11:51:490 [139681125603136] dut: Device State: ON";
    const OFF: &str = "Jul 11 16:11:53:490 [139681125603136] dut: Device State: OFF";
    const ERR: &str = "Jul 11 16:11:54:661 [139681125603136] dut: Device State: ERR";
    const OTHER: &str = "Jul 11 16:11:52:001 [139681125603136] dut: Device State: STANDBY";

    #[test]
    fn detects_error_marker_anywhere() {
        let classifier = Classifier::default();
        assert!(classifier.contains_error(ERR));
        assert!(classifier.contains_error("ERROR: disk full"));
        assert!(classifier.contains_error("ERR"));
        assert!(!classifier.contains_error(ON));
        assert!(!classifier.contains_error(OFF));
        assert!(!classifier.contains_error("err lowercase"));
    }

    #[test]
    fn detects_state_markers() {
        let classifier = Classifier::default();
        assert!(classifier.contains_on_state(ON));
        assert!(!classifier.contains_off_state(ON));
        assert!(classifier.contains_off_state(OFF));
        assert!(!classifier.contains_on_state(OFF));
        assert!(!classifier.contains_on_state(OTHER));
        assert!(!classifier.contains_off_state(OTHER));
    }

    #[test]
    fn classify_reports_state_and_error_independently() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(ON),
            Classification {
                error: false,
                state: Some(StateKind::On)
            }
        );
        assert_eq!(
            classifier.classify(ERR),
            Classification {
                error: true,
                state: None
            }
        );
        assert_eq!(
            classifier.classify("Jul 11 16:11:51:490 ERR then Device State: OFF"),
            Classification {
                error: true,
                state: Some(StateKind::Off)
            }
        );
        assert_eq!(classifier.classify(OTHER), Classification::default());
    }

    #[test]
    fn on_wins_over_off() {
        let classifier = Classifier::default();
        let line = "Jul 11 16:11:51:490 Device State: OFF Device State: ON";
        assert_eq!(classifier.classify(line).state, Some(StateKind::On));
    }

    #[test]
    fn uses_configured_markers() {
        let classifier = Classifier::new(Markers {
            on: "power=1".to_string(),
            off: "power=0".to_string(),
            error: "FAULT".to_string(),
        });
        assert_eq!(classifier.classify("x power=1").state, Some(StateKind::On));
        assert_eq!(classifier.classify("x power=0").state, Some(StateKind::Off));
        assert!(classifier.contains_error("x FAULT"));
        assert!(!classifier.contains_error(ERR));
    }
}
