use ultraviolet::Vec3;

pub trait CameraController {
    fn position(&self) -> Vec3;
    fn target(&self) -> Vec3;
}
