use std::sync::Arc;

use asset_common::scene::LoadedClip;

/// The playback state of one clip.
///
/// Elapsed time only ever accumulates. Playback repeats, the wrap is applied
/// when the playback position is read.
#[derive(Clone, Debug)]
pub struct ClipAction {
    clip: Arc<LoadedClip>,
    elapsed: f32,
    playing: bool,
}

impl ClipAction {
    pub fn new(clip: Arc<LoadedClip>) -> Self {
        Self {
            clip,
            elapsed: 0.0,
            playing: false,
        }
    }

    pub fn clip(&self) -> &Arc<LoadedClip> {
        &self.clip
    }

    /// Starts or resumes playback. Does nothing if the action is already playing.
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, delta_seconds: f32) {
        if !self.playing || !delta_seconds.is_finite() {
            return;
        }
        self.elapsed += delta_seconds;
    }

    /// The time inside the clip that should be shown.
    pub fn playback_position(&self) -> f32 {
        let duration = self.clip.duration();
        if duration <= 0.0 {
            return 0.0;
        }

        self.elapsed.rem_euclid(duration)
    }
}

#[cfg(test)]
mod tests {
    use asset_common::scene::{ChannelValues, Interpolation, LoadedChannel};
    use ultraviolet::Vec3;

    use super::*;

    fn two_second_clip() -> Arc<LoadedClip> {
        Arc::new(LoadedClip {
            name: Some("Float".into()),
            channels: vec![LoadedChannel {
                target_node: 0,
                interpolation: Interpolation::Linear,
                timestamps: vec![0.0, 2.0],
                values: ChannelValues::Translations(vec![Vec3::zero(), Vec3::unit_y()]),
            }],
        })
    }

    #[test]
    fn nothing_happens_before_play() {
        let mut action = ClipAction::new(two_second_clip());
        action.advance(0.5);

        assert_eq!(action.elapsed(), 0.0);
    }

    #[test]
    fn advancing_is_additive() {
        let mut split = ClipAction::new(two_second_clip());
        split.play();
        split.advance(0.3);
        split.advance(1.45);

        let mut once = ClipAction::new(two_second_clip());
        once.play();
        once.advance(1.75);

        assert!((split.elapsed() - once.elapsed()).abs() < 1e-5);
        assert!((split.playback_position() - once.playback_position()).abs() < 1e-5);
    }

    #[test]
    fn repeat_wraps_around() {
        let mut action = ClipAction::new(two_second_clip());
        action.play();
        action.advance(5.0);

        assert_eq!(action.elapsed(), 5.0);
        assert!((action.playback_position() - 1.0).abs() < 1e-5);
        assert!(action.is_playing());
    }

    #[test]
    fn empty_clips_stay_at_zero() {
        let mut action = ClipAction::new(Arc::new(LoadedClip::default()));
        action.play();
        action.advance(1.0);

        assert_eq!(action.playback_position(), 0.0);
    }
}
