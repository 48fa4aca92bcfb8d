//! Event classifier: maps binary channel edges to presses and contact writes.
//!
//! Each channel is handled on its own and immediately: there is no
//! debounce window and no arbitration between channels firing for the same
//! gesture. When several edges arrive together the contact state ends up as
//! whatever the last one wrote.

use knxbell_domain::accessory::{BinarySignal, Doorbell};
use knxbell_domain::contact::ContactState;
use knxbell_domain::group_address::GroupAddress;
use knxbell_domain::press::PressKind;

/// Outcome of one signal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub channel: PressKind,
    /// Set on a rising edge only.
    pub press: Option<PressKind>,
    pub contact: ContactState,
}

/// Classifier for the enabled channels of one doorbell.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    signals: Vec<BinarySignal>,
}

impl EventClassifier {
    /// Build a classifier from the doorbell's enabled signals.
    ///
    /// Disabled or absent channels get no classifier path at all.
    #[must_use]
    pub fn new(doorbell: &Doorbell) -> Self {
        Self {
            signals: doorbell
                .signals
                .iter()
                .filter(|sig| sig.enabled)
                .copied()
                .collect(),
        }
    }

    /// Enabled channels listening on `address`, in channel order.
    #[must_use]
    pub fn channels_for(&self, address: GroupAddress) -> Vec<PressKind> {
        self.signals
            .iter()
            .filter(|sig| sig.address == address)
            .map(|sig| sig.channel)
            .collect()
    }

    #[must_use]
    pub fn handles(&self, channel: PressKind) -> bool {
        self.signals.iter().any(|sig| sig.channel == channel)
    }

    /// Classify a new value on `channel`.
    ///
    /// Returns `None` for a channel this classifier does not handle.
    #[must_use]
    pub fn on_signal_change(&self, channel: PressKind, new_value: bool) -> Option<Classification> {
        if !self.handles(channel) {
            return None;
        }
        Some(Classification {
            channel,
            press: new_value.then_some(channel),
            contact: ContactState::from_signal(new_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ga(s: &str) -> GroupAddress {
        s.parse().unwrap()
    }

    fn classifier(double: bool, long: bool) -> EventClassifier {
        let mut builder = Doorbell::builder()
            .name("Front Door")
            .single_press(ga("1/0/1"));
        if double {
            builder = builder.double_press(ga("1/0/2"));
        }
        if long {
            builder = builder.long_press(ga("1/0/3"));
        }
        EventClassifier::new(&builder.build().unwrap())
    }

    #[test]
    fn should_emit_single_press_and_detect_contact_on_rising_edge() {
        let result = classifier(false, false).on_signal_change(PressKind::Single, true);
        assert_eq!(
            result,
            Some(Classification {
                channel: PressKind::Single,
                press: Some(PressKind::Single),
                contact: ContactState::Detected,
            })
        );
    }

    #[test]
    fn should_clear_contact_without_press_on_falling_edge() {
        let result = classifier(false, false).on_signal_change(PressKind::Single, false);
        assert_eq!(
            result,
            Some(Classification {
                channel: PressKind::Single,
                press: None,
                contact: ContactState::NotDetected,
            })
        );
    }

    #[test]
    fn should_classify_double_and_long_when_configured() {
        let c = classifier(true, true);
        let double = c.on_signal_change(PressKind::Double, true).unwrap();
        let long = c.on_signal_change(PressKind::Long, true).unwrap();
        assert_eq!(double.press, Some(PressKind::Double));
        assert_eq!(long.press, Some(PressKind::Long));
    }

    #[test]
    fn should_never_classify_unconfigured_channel() {
        let c = classifier(false, false);
        assert_eq!(c.on_signal_change(PressKind::Double, true), None);
        assert_eq!(c.on_signal_change(PressKind::Long, true), None);
    }

    #[test]
    fn should_never_classify_disabled_channel() {
        let doorbell = Doorbell::builder()
            .name("Front Door")
            .single_press(ga("1/0/1"))
            .long_press(ga("1/0/3"))
            .disable(PressKind::Long)
            .build()
            .unwrap();
        let c = EventClassifier::new(&doorbell);
        assert_eq!(c.on_signal_change(PressKind::Long, true), None);
        assert!(c.channels_for(ga("1/0/3")).is_empty());
    }

    #[test]
    fn should_list_channels_for_address() {
        let c = classifier(true, false);
        assert_eq!(c.channels_for(ga("1/0/2")), vec![PressKind::Double]);
        assert!(c.channels_for(ga("7/7/7")).is_empty());
    }
}
