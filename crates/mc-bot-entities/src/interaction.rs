//! Commands that turn intent into serverbound writes.
//!
//! Writes are queued on the tracker in issue order and collected by the transport through
//! [`EntityTracker::drain_outgoing`].

use mc_bot_proto::packets::steer_vehicle::FLAG_JUMP;
use mc_bot_proto::packets::{
    ArmAnimation, Hand, InteractPoint, ServerboundPacket, SteerVehicle, UseEntity,
};
use tracing::{debug, trace};

use crate::entity::EntityId;
use crate::error::InteractionError;
use crate::events::EntityEvent;
use crate::tracker::EntityTracker;

impl EntityTracker {
    fn queue(&mut self, packet: ServerboundPacket) {
        trace!(packet = packet.name(), "queueing write");
        self.outgoing.push(packet);
    }

    pub fn swing(&mut self, hand: Hand) {
        self.queue(ServerboundPacket::ArmAnimation(ArmAnimation { hand }));
    }

    /// Hit `target`. With `swing`, the arm animation follows the attack.
    pub fn attack(&mut self, target: EntityId, swing: bool) {
        self.queue(ServerboundPacket::UseEntity(UseEntity::attack(target)));
        if swing {
            self.swing(Hand::Main);
        }
    }

    /// Right-click `target`, optionally at a point on its hitbox.
    pub fn use_on(&mut self, target: EntityId, point: Option<InteractPoint>) {
        self.queue(ServerboundPacket::UseEntity(UseEntity::interact(target, point)));
    }

    pub fn mount(&mut self, target: EntityId) {
        self.use_on(target, None);
    }

    /// Leave the current vehicle. Without one the failure is also delivered to listeners
    /// as [`EntityEvent::Error`].
    pub fn dismount(&mut self) -> Result<(), InteractionError> {
        let vehicle = self.local_entity().and_then(|e| e.vehicle);
        if vehicle.is_none() {
            debug!("dismount while not mounted");
            let err = InteractionError::NotMounted;
            self.pending.push(EntityEvent::Error(err.clone()));
            self.flush();
            return Err(err);
        }
        self.queue(ServerboundPacket::SteerVehicle(SteerVehicle::unmount()));
        Ok(())
    }

    pub fn move_vehicle(&mut self, left: f32, forward: f32) {
        self.queue(ServerboundPacket::SteerVehicle(SteerVehicle {
            sideways: left,
            forward,
            flags: FLAG_JUMP,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use mc_bot_proto::features::FeatureSet;
    use mc_bot_proto::packets::steer_vehicle::FLAG_UNMOUNT;
    use mc_bot_proto::packets::{ClientboundPacket, Login, Mouse, SetPassengers};

    fn logged_in() -> EntityTracker {
        let features = FeatureSet::for_version("1.8.9").unwrap();
        let mut tracker = EntityTracker::new("Bot", &features);
        tracker.handle(&ClientboundPacket::Login(Login { entity_id: 1 }));
        tracker
    }

    #[test]
    fn attack_then_swing() {
        let mut tracker = logged_in();
        tracker.attack(5, true);
        let writes = tracker.drain_outgoing();
        assert_eq!(writes.len(), 2);
        match &writes[0] {
            ServerboundPacket::UseEntity(u) => {
                assert_eq!(u.target, 5);
                assert_eq!(u.mouse, Mouse::Hit);
                assert_eq!(u.mouse.code(), 1);
                assert!(!u.sneaking);
            }
            other => panic!("expected use_entity, got {other:?}"),
        }
        assert_eq!(
            writes[1],
            ServerboundPacket::ArmAnimation(ArmAnimation { hand: Hand::Main })
        );
        assert!(tracker.drain_outgoing().is_empty());
    }

    #[test]
    fn attack_without_swing() {
        let mut tracker = logged_in();
        tracker.attack(5, false);
        assert_eq!(tracker.drain_outgoing().len(), 1);
    }

    #[test]
    fn use_keeps_zero_coordinates() {
        let mut tracker = logged_in();
        tracker.use_on(3, Some(InteractPoint::new(0.0, 0.0, 0.0)));
        tracker.mount(4);
        let writes = tracker.drain_outgoing();
        match (&writes[0], &writes[1]) {
            (ServerboundPacket::UseEntity(at), ServerboundPacket::UseEntity(mount)) => {
                assert_eq!(at.mouse, Mouse::Use);
                assert_eq!(at.point, Some(InteractPoint::new(0.0, 0.0, 0.0)));
                assert_eq!(mount.target, 4);
                assert_eq!(mount.mouse, Mouse::Use);
                assert!(mount.point.is_none());
            }
            other => panic!("unexpected writes {other:?}"),
        }
    }

    #[test]
    fn dismount_without_vehicle_reports_error() {
        let mut tracker = logged_in();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.subscribe_fn(move |event, _| sink.lock().unwrap().push(event.clone()));

        assert_eq!(tracker.dismount(), Err(InteractionError::NotMounted));
        assert!(tracker.drain_outgoing().is_empty());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![EntityEvent::Error(InteractionError::NotMounted)]
        );
    }

    #[test]
    fn dismount_before_login_is_not_mounted() {
        let features = FeatureSet::for_version("1.8.9").unwrap();
        let mut tracker = EntityTracker::new("Bot", &features);
        assert_eq!(tracker.dismount(), Err(InteractionError::NotMounted));
    }

    #[test]
    fn dismount_and_steer_while_riding() {
        let mut tracker = logged_in();
        tracker.handle(&ClientboundPacket::SetPassengers(SetPassengers {
            entity_id: 40,
            passengers: vec![1],
        }));
        assert_eq!(tracker.dismount(), Ok(()));
        tracker.move_vehicle(0.5, -1.0);
        let writes = tracker.drain_outgoing();
        assert_eq!(
            writes,
            vec![
                ServerboundPacket::SteerVehicle(SteerVehicle {
                    sideways: 0.0,
                    forward: 0.0,
                    flags: FLAG_UNMOUNT,
                }),
                ServerboundPacket::SteerVehicle(SteerVehicle {
                    sideways: 0.5,
                    forward: -1.0,
                    flags: FLAG_JUMP,
                }),
            ]
        );
    }

    #[test]
    fn swing_off_hand() {
        let mut tracker = logged_in();
        tracker.swing(Hand::Off);
        assert_eq!(
            tracker.drain_outgoing(),
            vec![ServerboundPacket::ArmAnimation(ArmAnimation { hand: Hand::Off })]
        );
    }
}
