use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;
use constants::landmark::{
    COLLAPSED_MODEL_SCALE, HOVER_GROW_SECONDS, HOVER_SHRINK_SECONDS, HOVER_SPIN_PERIOD_SECONDS,
};

/// What happens once a scale tween reaches its end value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenFinish {
    /// Leave the entity at the end scale.
    Settle,
    /// Hand the entity back to its owner for disposal.
    Release,
}

/// Uniform scale animation driven by elapsed frame time.
#[derive(Component, Debug, Clone)]
pub struct ScaleTween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    ease: EaseFunction,
    pub on_finish: TweenFinish,
}

impl ScaleTween {
    /// Hover preview growth from the current scale.
    pub fn grow(from: f32, to: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: HOVER_GROW_SECONDS,
            ease: EaseFunction::QuarticOut,
            on_finish: TweenFinish::Settle,
        }
    }

    /// Collapse before disposal.
    pub fn shrink(from: f32) -> Self {
        Self {
            from,
            to: COLLAPSED_MODEL_SCALE,
            elapsed: 0.0,
            duration: HOVER_SHRINK_SECONDS,
            ease: EaseFunction::QuarticIn,
            on_finish: TweenFinish::Release,
        }
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.finished() {
            return self.to;
        }
        let t = self.ease.sample_clamped(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Continuous rotation about +Y.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub period: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            period: HOVER_SPIN_PERIOD_SECONDS,
        }
    }
}

pub fn advance_scale_tweens(time: Res<Time>, mut tweens: Query<(&mut Transform, &mut ScaleTween)>) {
    let dt = time.delta_secs();
    for (mut transform, mut tween) in tweens.iter_mut() {
        transform.scale = Vec3::splat(tween.advance(dt));
    }
}

pub fn advance_spins(time: Res<Time>, mut spinning: Query<(&mut Transform, &Spin)>) {
    let dt = time.delta_secs();
    for (mut transform, spin) in spinning.iter_mut() {
        if spin.period > 0.0 {
            transform.rotate_y(std::f32::consts::TAU / spin.period * dt);
        }
    }
}

/// Drop finished tweens that need no follow-up.
pub fn clear_settled_tweens(mut commands: Commands, tweens: Query<(Entity, &ScaleTween)>) {
    for (entity, tween) in tweens.iter() {
        if tween.finished() && tween.on_finish == TweenFinish::Settle {
            commands.entity(entity).remove::<ScaleTween>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_front_loads_and_lands_on_target() {
        let mut tween = ScaleTween::grow(COLLAPSED_MODEL_SCALE, 0.8);
        let early = tween.advance(HOVER_GROW_SECONDS * 0.25);
        // Quartic-out covers most of the distance early.
        assert!(early > 0.5);
        assert!(!tween.finished());

        assert_eq!(tween.advance(1.0), 0.8);
        assert!(tween.finished());
    }

    #[test]
    fn shrink_starts_slowly_and_releases() {
        let mut tween = ScaleTween::shrink(0.8);
        assert!(tween.advance(HOVER_SHRINK_SECONDS * 0.25) > 0.79);
        assert_eq!(tween.advance(HOVER_SHRINK_SECONDS), COLLAPSED_MODEL_SCALE);
        assert_eq!(tween.on_finish, TweenFinish::Release);
    }
}
