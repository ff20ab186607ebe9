//! Time-based transform interpolation.
//!
//! Each tween drives one [`Channel`] (a node property or the camera). Starting
//! a tween on a channel that is already animating replaces the running one, so
//! the latest request always wins and the superseded tween never completes.
//! Completion events and plain timers are reported from [`Animator::advance`]
//! in the tick where they finish, in the order they were started.

use crate::book::BookSlot;
use crate::camera::Camera;
use crate::easing::Easing;
use crate::scene::{NodeId, SceneGraph};
use glam::{Quat, Vec3};
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeProperty {
    Translation,
    Rotation,
    Scale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Node { id: NodeId, prop: NodeProperty },
    CameraEye,
    CameraTarget,
}

impl Channel {
    pub fn translation(id: NodeId) -> Self {
        Channel::Node {
            id,
            prop: NodeProperty::Translation,
        }
    }

    pub fn rotation(id: NodeId) -> Self {
        Channel::Node {
            id,
            prop: NodeProperty::Rotation,
        }
    }

    pub fn scale(id: NodeId) -> Self {
        Channel::Node {
            id,
            prop: NodeProperty::Scale,
        }
    }

    fn node(&self) -> Option<NodeId> {
        match *self {
            Channel::Node { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Track {
    Vec3 { from: Vec3, to: Vec3 },
    Quat { from: Quat, to: Quat },
    /// Rotation about local Y by an angle, applied on top of `base`. Unlike a
    /// quaternion slerp this can sweep a full half turn in a chosen direction.
    Yaw { base: Quat, from: f32, to: f32 },
}

/// Stamp that ties an event to the transition that requested it, so a stale
/// completion can be recognized and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Ticket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Opened { slot: BookSlot, ticket: Ticket },
    Closed { slot: BookSlot, ticket: Ticket },
    FlipFinished { slot: BookSlot, ticket: Ticket },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

#[derive(Debug)]
struct Tween {
    id: TweenId,
    channel: Channel,
    track: Track,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
    on_complete: Option<AnimationEvent>,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }
}

#[derive(Debug)]
struct Timer {
    seq: u64,
    remaining: Duration,
    event: AnimationEvent,
}

pub type Events = SmallVec<[AnimationEvent; 4]>;

#[derive(Debug, Default)]
pub struct Animator {
    tweens: Vec<Tween>,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn start(&mut self, channel: Channel, track: Track, duration: Duration, easing: Easing) -> TweenId {
        self.tweens.retain(|t| t.channel != channel);
        let id = TweenId(self.seq());
        self.tweens.push(Tween {
            id,
            channel,
            track,
            elapsed: Duration::ZERO,
            duration,
            easing,
            on_complete: None,
        });
        id
    }

    /// Tween a node's translation from its current value to `to`.
    pub fn move_node(&mut self, scene: &SceneGraph, id: NodeId, to: Vec3, duration: Duration) -> TweenId {
        let from = scene.get(id).map_or(to, |n| n.local.translation);
        self.start(Channel::translation(id), Track::Vec3 { from, to }, duration, Easing::Linear)
    }

    pub fn rotate_node(&mut self, scene: &SceneGraph, id: NodeId, to: Quat, duration: Duration) -> TweenId {
        let from = scene.get(id).map_or(to, |n| n.local.rotation);
        self.start(Channel::rotation(id), Track::Quat { from, to }, duration, Easing::Linear)
    }

    pub fn scale_node(&mut self, scene: &SceneGraph, id: NodeId, to: Vec3, duration: Duration) -> TweenId {
        let from = scene.get(id).map_or(to, |n| n.local.scale);
        self.start(Channel::scale(id), Track::Vec3 { from, to }, duration, Easing::Linear)
    }

    /// Sweep a node's rotation `base * rot_y(angle)` from `from` to `to` radians.
    pub fn yaw_node(
        &mut self,
        id: NodeId,
        base: Quat,
        from: f32,
        to: f32,
        duration: Duration,
        easing: Easing,
    ) -> TweenId {
        self.start(Channel::rotation(id), Track::Yaw { base, from, to }, duration, easing)
    }

    pub fn move_camera(&mut self, camera: &Camera, eye: Vec3, duration: Duration) -> TweenId {
        self.start(
            Channel::CameraEye,
            Track::Vec3 {
                from: camera.eye,
                to: eye,
            },
            duration,
            Easing::Linear,
        )
    }

    pub fn aim_camera(&mut self, camera: &Camera, target: Vec3, duration: Duration) -> TweenId {
        self.start(
            Channel::CameraTarget,
            Track::Vec3 {
                from: camera.target,
                to: target,
            },
            duration,
            Easing::Linear,
        )
    }

    /// Report `event` when tween `id` finishes. Ignored if it was already superseded.
    pub fn on_complete(&mut self, id: TweenId, event: AnimationEvent) {
        if let Some(t) = self.tweens.iter_mut().find(|t| t.id == id) {
            t.on_complete = Some(event);
        }
    }

    /// Report `event` after `delay`, independent of any tween.
    pub fn schedule(&mut self, delay: Duration, event: AnimationEvent) {
        let seq = self.seq();
        self.timers.push(Timer {
            seq,
            remaining: delay,
            event,
        });
    }

    pub fn cancel(&mut self, channel: Channel) {
        self.tweens.retain(|t| t.channel != channel);
    }

    /// Drop every tween on any property of `id`.
    pub fn cancel_node(&mut self, id: NodeId) {
        self.tweens.retain(|t| t.channel.node() != Some(id));
    }

    pub fn is_animating(&self, channel: Channel) -> bool {
        self.tweens.iter().any(|t| t.channel == channel)
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Step every tween and timer by `dt`, write the interpolated values and
    /// return the events that fired during this step.
    pub fn advance(&mut self, dt: Duration, scene: &mut SceneGraph, camera: &mut Camera) -> Events {
        let mut fired: SmallVec<[(u64, AnimationEvent); 4]> = SmallVec::new();

        for tween in &mut self.tweens {
            tween.elapsed = tween.elapsed.saturating_add(dt);
            let t = tween.easing.evaluate(tween.progress());
            apply(tween.channel, &tween.track, t, scene, camera);
        }
        self.tweens.retain(|tween| {
            let done = tween.progress() >= 1.0;
            if done {
                if let Some(ev) = tween.on_complete {
                    fired.push((tween.id.0, ev));
                }
            }
            !done
        });

        self.timers.retain_mut(|timer| {
            timer.remaining = timer.remaining.saturating_sub(dt);
            if timer.remaining.is_zero() {
                fired.push((timer.seq, timer.event));
                false
            } else {
                true
            }
        });

        fired.sort_by_key(|(seq, _)| *seq);
        fired.into_iter().map(|(_, ev)| ev).collect()
    }
}

fn apply(channel: Channel, track: &Track, t: f32, scene: &mut SceneGraph, camera: &mut Camera) {
    match (channel, *track) {
        (Channel::CameraEye, Track::Vec3 { from, to }) => camera.eye = from.lerp(to, t),
        (Channel::CameraTarget, Track::Vec3 { from, to }) => camera.target = from.lerp(to, t),
        (Channel::Node { id, prop }, track) => {
            let Some(node) = scene.get_mut(id) else {
                return;
            };
            match (prop, track) {
                (NodeProperty::Translation, Track::Vec3 { from, to }) => {
                    node.local.translation = from.lerp(to, t)
                }
                (NodeProperty::Scale, Track::Vec3 { from, to }) => node.local.scale = from.lerp(to, t),
                (NodeProperty::Rotation, Track::Quat { from, to }) => {
                    node.local.rotation = from.slerp(to, t).normalize()
                }
                (NodeProperty::Rotation, Track::Yaw { base, from, to }) => {
                    let angle = from + (to - from) * t;
                    node.local.rotation = (base * Quat::from_rotation_y(angle)).normalize();
                }
                _ => log::warn!("[animator] track does not match {prop:?}"),
            }
        }
        _ => log::warn!("[animator] track does not match {channel:?}"),
    }
}
