use crate::constants::*;
use crate::profile::DeviceProfile;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Eye and look-at target; what the viewer saves on open and restores on close.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn for_profile(profile: DeviceProfile, aspect: f32) -> Self {
        let (eye, target) = match profile {
            DeviceProfile::Desktop => (DESKTOP_CAMERA_EYE, DESKTOP_CAMERA_TARGET),
            DeviceProfile::Mobile => (
                Vec3::new(0.0, STACK_CENTER_Y, MOBILE_CAMERA_Z),
                Vec3::new(0.0, STACK_CENTER_Y, 0.0),
            ),
        };
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy: DESKTOP_FOV_DEG.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye,
            target: self.target,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.eye = pose.eye;
        self.target = pose.target;
    }

    /// World-space ray through `pos` (pixels, origin top-left) of a `viewport`-sized surface.
    pub fn ray_from_screen(&self, pos: Vec2, viewport: Vec2) -> Ray {
        let w = viewport.x.max(1.0);
        let h = viewport.y.max(1.0);
        let ndc_x = (2.0 * pos.x / w) - 1.0;
        let ndc_y = 1.0 - (2.0 * pos.y / h);
        let inv = self.view_proj().inverse();
        let p_near = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p0 = p_near.truncate() / p_near.w;
        let p1 = p_far.truncate() / p_far.w;
        Ray {
            origin: self.eye,
            dir: (p1 - p0).normalize_or_zero(),
        }
    }

    /// Orientation of the camera as a quaternion (looking down its local -Z).
    pub fn orientation(&self) -> Quat {
        look_rotation(self.target - self.eye, self.up)
    }

    /// Rotate the eye around the target about the world Y axis. The polar
    /// angle and distance are left untouched.
    pub fn orbit_yaw(&mut self, radians: f32) {
        let offset = self.eye - self.target;
        self.eye = self.target + Quat::from_rotation_y(radians) * offset;
    }

    /// Move the eye along the view direction, keeping the distance in `[min, max]`.
    pub fn zoom_to(&mut self, distance: f32, min: f32, max: f32) {
        let offset = self.eye - self.target;
        let dir = offset.try_normalize().unwrap_or(Vec3::Z);
        self.eye = self.target + dir * distance.clamp(min, max);
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

/// Rotation taking local -Z to `forward` with local +Y as close to `up` as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.try_normalize().unwrap_or(Vec3::NEG_Z);
    let r = f.cross(up).try_normalize().unwrap_or(Vec3::X);
    let u = r.cross(f);
    Quat::from_mat3(&glam::Mat3::from_cols(r, u, -f)).normalize()
}

/// Rotation whose local +Z faces from `from` toward `to`.
pub fn face_towards(from: Vec3, to: Vec3) -> Quat {
    look_rotation(from - to, Vec3::Y)
}
