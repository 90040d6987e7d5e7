use ultraviolet::{Rotor3, Vec3};

/// A named, time-indexed set of channels. Each channel animates one property of one node.
#[derive(Clone, Debug, Default)]
pub struct LoadedClip {
    pub name: Option<String>,
    pub channels: Vec<LoadedChannel>,
}

impl LoadedClip {
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .map(LoadedChannel::duration)
            .fold(0.0, f32::max)
    }
}

#[derive(Clone, Debug)]
pub struct LoadedChannel {
    /// Index into [`super::LoadedModel::nodes`]
    pub target_node: usize,
    pub interpolation: Interpolation,
    pub timestamps: Vec<f32>,
    /// For [`Interpolation::CubicSpline`] every keyframe stores three values:
    /// in-tangent, value, out-tangent.
    pub values: ChannelValues,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

#[derive(Clone, Debug)]
pub enum ChannelValues {
    Translations(Vec<Vec3>),
    /// Quaternions in `[x, y, z, w]` order
    Rotations(Vec<[f32; 4]>),
    Scales(Vec<Vec3>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelSample {
    Translation(Vec3),
    Rotation(Rotor3),
    Scale(Vec3),
}

/// Index of the keyframe that starts the segment containing a timestamp.
/// Kept between samples so that playback doesn't have to search from the start every frame.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnimationKeyframe(usize);

impl AnimationKeyframe {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl LoadedChannel {
    pub fn duration(&self) -> f32 {
        self.timestamps.last().copied().unwrap_or_default()
    }

    pub fn get_keyframe(
        &self,
        timestamp: f32,
        last_keyframe: AnimationKeyframe,
    ) -> AnimationKeyframe {
        if self.timestamps.is_empty() {
            return AnimationKeyframe(0);
        }

        let mut index = match self.timestamps.get(last_keyframe.0) {
            Some(&start) if start <= timestamp => last_keyframe.0,
            _ => 0,
        };
        while index + 1 < self.timestamps.len() && self.timestamps[index + 1] <= timestamp {
            index += 1;
        }

        AnimationKeyframe(index)
    }

    /// Returns `None` for channels without keyframes.
    pub fn sample(&self, keyframe: AnimationKeyframe, timestamp: f32) -> Option<ChannelSample> {
        let count = self.timestamps.len();
        if count == 0 {
            return None;
        }

        let index = keyframe.0.min(count - 1);
        let next = (index + 1).min(count - 1);
        let start = self.timestamps[index];
        let segment = self.timestamps[next] - start;
        let t = if next == index || segment <= 0.0 {
            0.0
        } else {
            ((timestamp - start) / segment).clamp(0.0, 1.0)
        };

        let sample = match &self.values {
            ChannelValues::Translations(values) => ChannelSample::Translation(
                self.sample_vec3(values, index, next, t, segment)?,
            ),
            ChannelValues::Scales(values) => {
                ChannelSample::Scale(self.sample_vec3(values, index, next, t, segment)?)
            }
            ChannelValues::Rotations(values) => {
                let quaternion = self.sample_quaternion(values, index, next, t, segment)?;
                ChannelSample::Rotation(Rotor3::from_quaternion_array(quaternion))
            }
        };
        Some(sample)
    }

    fn sample_vec3(
        &self,
        values: &[Vec3],
        index: usize,
        next: usize,
        t: f32,
        segment: f32,
    ) -> Option<Vec3> {
        match self.interpolation {
            Interpolation::Step => values.get(index).copied(),
            Interpolation::Linear => {
                let start = *values.get(index)?;
                let end = *values.get(next)?;
                Some(start + (end - start) * t)
            }
            Interpolation::CubicSpline => {
                let start = *values.get(index * 3 + 1)?;
                let start_out = *values.get(index * 3 + 2)?;
                let end_in = *values.get(next * 3)?;
                let end = *values.get(next * 3 + 1)?;
                let [h00, h10, h01, h11] = hermite_basis(t);
                Some(start * h00 + start_out * (h10 * segment) + end * h01 + end_in * (h11 * segment))
            }
        }
    }

    fn sample_quaternion(
        &self,
        values: &[[f32; 4]],
        index: usize,
        next: usize,
        t: f32,
        segment: f32,
    ) -> Option<[f32; 4]> {
        match self.interpolation {
            Interpolation::Step => values.get(index).copied().map(normalize_quaternion),
            Interpolation::Linear => {
                let start = *values.get(index)?;
                let end = *values.get(next)?;
                Some(nlerp_quaternion(start, end, t))
            }
            Interpolation::CubicSpline => {
                let start = *values.get(index * 3 + 1)?;
                let start_out = *values.get(index * 3 + 2)?;
                let end_in = *values.get(next * 3)?;
                let end = *values.get(next * 3 + 1)?;
                let [h00, h10, h01, h11] = hermite_basis(t);
                let blended = std::array::from_fn(|i| {
                    start[i] * h00
                        + start_out[i] * h10 * segment
                        + end[i] * h01
                        + end_in[i] * h11 * segment
                });
                Some(normalize_quaternion(blended))
            }
        }
    }
}

fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

/// Normalized linear interpolation along the shorter arc.
fn nlerp_quaternion(start: [f32; 4], end: [f32; 4], t: f32) -> [f32; 4] {
    let dot: f32 = start.iter().zip(end.iter()).map(|(a, b)| a * b).sum();
    let sign = if dot < 0.0 { -1.0 } else { 1.0 };
    normalize_quaternion(std::array::from_fn(|i| {
        start[i] * (1.0 - t) + end[i] * sign * t
    }))
}

fn normalize_quaternion(quaternion: [f32; 4]) -> [f32; 4] {
    let length = quaternion.iter().map(|v| v * v).sum::<f32>().sqrt();
    if length <= f32::EPSILON {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        quaternion.map(|v| v / length)
    }
}
