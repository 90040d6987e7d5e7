use std::sync::Arc;

use asset_common::scene::{AnimationKeyframe, ChannelSample, LoadedClip};

use crate::scene::{NodeId, SceneGraph};

use super::ClipAction;

/// Connects one channel of the clip to the node it animates.
#[derive(Clone, Debug)]
struct ChannelBinding {
    channel: usize,
    node: NodeId,
    last_keyframe: AnimationKeyframe,
}

/// Plays one clip on a scene graph.
///
/// The channel targets are looked up once, when the driver is created.
/// Channels that point at nodes the graph doesn't have are left out.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    root: NodeId,
    action: ClipAction,
    bindings: Vec<ChannelBinding>,
}

impl AnimationDriver {
    pub fn new(graph: &SceneGraph, clip: Arc<LoadedClip>) -> Self {
        let bindings = clip
            .channels
            .iter()
            .enumerate()
            .filter_map(|(channel, loaded)| match graph.model_node(loaded.target_node) {
                Some(node) => Some(ChannelBinding {
                    channel,
                    node,
                    last_keyframe: Default::default(),
                }),
                None => {
                    log::warn!(
                        "Animation channel {} targets missing node {}",
                        channel,
                        loaded.target_node
                    );
                    None
                }
            })
            .collect();

        Self {
            root: graph.root(),
            action: ClipAction::new(clip),
            bindings,
        }
    }

    /// The root of the graph this driver animates.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn action(&self) -> &ClipAction {
        &self.action
    }

    pub fn action_mut(&mut self) -> &mut ClipAction {
        &mut self.action
    }

    pub fn bound_channels(&self) -> usize {
        self.bindings.len()
    }

    /// Moves playback forward and writes the sampled values into the animated nodes.
    pub fn update(&mut self, delta_seconds: f32, graph: &mut SceneGraph) {
        self.action.advance(delta_seconds);
        let position = self.action.playback_position();
        let clip = self.action.clip().clone();

        for binding in &mut self.bindings {
            let Some(channel) = clip.channels.get(binding.channel) else {
                continue;
            };
            let keyframe = channel.get_keyframe(position, binding.last_keyframe);
            binding.last_keyframe = keyframe;

            let Some(sample) = channel.sample(keyframe, position) else {
                continue;
            };
            let Some(node) = graph.node_mut(binding.node) else {
                continue;
            };
            match sample {
                ChannelSample::Translation(position) => node.transform.position = position,
                ChannelSample::Rotation(orientation) => node.transform.orientation = orientation,
                ChannelSample::Scale(scale) => node.transform.scale = scale,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use asset_common::{
        scene::{ChannelValues, Interpolation, LoadedChannel, LoadedModel, LoadedNode},
        transform::Transform,
    };
    use ultraviolet::Vec3;

    use crate::scene::MaterialIdGenerator;

    use super::*;

    fn graph() -> SceneGraph {
        let model = LoadedModel {
            nodes: vec![LoadedNode {
                name: Some("body".into()),
                transform: Transform::default(),
                ..Default::default()
            }],
            roots: vec![0],
            ..Default::default()
        };
        SceneGraph::from_model(&model, &MaterialIdGenerator::new())
    }

    fn bob_clip(target_node: usize) -> Arc<LoadedClip> {
        Arc::new(LoadedClip {
            name: Some("Float".into()),
            channels: vec![LoadedChannel {
                target_node,
                interpolation: Interpolation::Linear,
                timestamps: vec![0.0, 1.0, 2.0],
                values: ChannelValues::Translations(vec![
                    Vec3::zero(),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::zero(),
                ]),
            }],
        })
    }

    #[test]
    fn writes_samples_into_the_target() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new(&graph, bob_clip(0));
        driver.action_mut().play();
        driver.update(0.5, &mut graph);

        let body = graph.node(NodeId::new(0)).unwrap();
        assert!((body.transform.position.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn loops_by_default() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new(&graph, bob_clip(0));
        driver.action_mut().play();
        driver.update(1.5, &mut graph);
        driver.update(1.0, &mut graph);

        let body = graph.node(NodeId::new(0)).unwrap();
        assert!((driver.action().playback_position() - 0.5).abs() < 1e-5);
        assert!((body.transform.position.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn split_updates_match_a_single_update() {
        let mut split_graph = graph();
        let mut split = AnimationDriver::new(&split_graph, bob_clip(0));
        split.action_mut().play();
        split.update(0.25, &mut split_graph);
        split.update(0.6, &mut split_graph);

        let mut single_graph = graph();
        let mut single = AnimationDriver::new(&single_graph, bob_clip(0));
        single.action_mut().play();
        single.update(0.85, &mut single_graph);

        assert!((split.action().elapsed() - single.action().elapsed()).abs() < 1e-5);
        let split_y = split_graph.node(NodeId::new(0)).unwrap().transform.position.y;
        let single_y = single_graph.node(NodeId::new(0)).unwrap().transform.position.y;
        assert!((split_y - single_y).abs() < 1e-5);
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new(&graph, bob_clip(7));
        driver.action_mut().play();
        driver.update(0.5, &mut graph);

        assert_eq!(driver.bound_channels(), 0);
        assert_eq!(driver.root(), graph.root());
    }
}
