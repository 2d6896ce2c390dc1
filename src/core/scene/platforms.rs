//=========================================================================
// Scene Platforms
//=========================================================================
//
// Chunk placement and camera culling for `Platform` runs.
//
// Placement:
// ```text
//   platform.x          next_chunk_x()
//      │                     │
//      [chunk][chunk][chunk] [new chunk]     bottom edge on the stage floor
// ```
//
//=========================================================================

use log::{debug, warn};

use super::Scene;
use crate::core::error::EngineError;
use crate::core::geometry::{Axis, Point};
use crate::core::object::{GameObject, ObjectId, Platform, PlatformId};

impl Scene {
    //--- Creation ---------------------------------------------------------

    /// Starts an empty platform whose first chunk will sit at `x`.
    pub fn create_platform(&mut self, x: i32) -> PlatformId {
        self.platforms.push(Platform::new(x));
        PlatformId {
            scene: self.id,
            index: self.platforms.len() - 1,
        }
    }

    pub fn platform(&self, id: PlatformId) -> Result<&Platform, EngineError> {
        let index = self.platform_index(id)?;
        Ok(&self.platforms[index])
    }

    fn platform_index(&self, id: PlatformId) -> Result<usize, EngineError> {
        if id.scene != self.id {
            return Err(EngineError::ForeignPlatform {
                platform: id,
                scene: self.id,
            });
        }
        if id.index >= self.platforms.len() {
            return Err(EngineError::UnknownPlatform(id));
        }
        Ok(id.index)
    }

    //--- Chunks -----------------------------------------------------------

    /// Appends `chunk` to the right end of the platform.
    ///
    /// The chunk lands on the stage floor at z 0 with collision on. The
    /// stage grows when the platform outgrows it, and a chunk outside
    /// the camera's padded view starts hidden.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingWidth`] / [`EngineError::MissingHeight`] for
    /// chunks without a positive size, [`EngineError::ForeignPlatform`]
    /// for a platform of another scene.
    pub fn add_chunk(&mut self, platform: PlatformId, mut chunk: GameObject) -> Result<ObjectId, EngineError> {
        let index = self.platform_index(platform)?;

        if chunk.width() <= 0 {
            return Err(EngineError::MissingWidth(chunk.id()));
        }
        if chunk.height() <= 0 {
            return Err(EngineError::MissingHeight(chunk.id()));
        }

        let width = chunk.width();
        chunk.position = Point::new(
            self.platforms[index].next_chunk_x(),
            self.stage.height - chunk.height(),
        );
        chunk.z = 0;
        chunk.collision = true;

        let id = self.add_object(chunk);

        let run = &mut self.platforms[index];
        run.chunks.push(id);
        run.width += width;
        let right_edge = run.x + run.width;
        let padding = run.visibility_padding;

        if right_edge > self.stage.width {
            self.set_stage_width(right_edge);
        }

        if let Ok(false) = self.is_object_in_view(id, padding, padding) {
            if let Some(mut object) = self.object_mut(id) {
                object.hide();
            }
        }

        debug!(target: "scene", "Platform {:?} grew to {} px", platform, self.platforms[index].width);
        Ok(id)
    }

    //--- Movement ---------------------------------------------------------

    /// Shifts every chunk so the platform starts at `x`.
    ///
    /// Chunks move through the normal authorized path, leading chunk
    /// first, so neighbours never block each other. A refused chunk stays
    /// where it was while the platform origin still moves to `x`, so later
    /// chunks are appended from the new origin. Returns how many chunks
    /// were refused.
    pub fn set_platform_x(&mut self, platform: PlatformId, x: i32) -> Result<usize, EngineError> {
        let index = self.platform_index(platform)?;
        let diff = x.saturating_sub(self.platforms[index].x);
        if diff == 0 {
            return Ok(0);
        }

        let mut chunks = self.platforms[index].chunks.clone();
        if diff > 0 {
            chunks.reverse();
        }

        let mut stuck = 0;
        for chunk in chunks {
            let Some(current) = self.object(chunk).map(GameObject::x) else {
                continue;
            };
            if !self.move_object(chunk, Axis::X, current.saturating_add(diff)) {
                warn!(target: "scene", "Chunk {} of platform {:?} could not follow", chunk, platform);
                stuck += 1;
            }
        }

        self.platforms[index].x = x;
        Ok(stuck)
    }

    pub fn set_platform_visibility_padding(&mut self, platform: PlatformId, padding: i32) -> Result<(), EngineError> {
        let index = self.platform_index(platform)?;
        self.platforms[index].visibility_padding = padding;
        self.cull_platforms();
        Ok(())
    }

    //--- Culling ----------------------------------------------------------

    /// Shows chunks near the camera view and hides the rest.
    pub(crate) fn cull_platforms(&mut self) {
        let Some(camera) = &self.camera else {
            return;
        };

        for platform in &self.platforms {
            let padding = platform.visibility_padding;
            for chunk in &platform.chunks {
                let Some(object) = self.objects.iter_mut().find(|o| o.id == *chunk) else {
                    continue;
                };
                let visible = camera.is_object_in_view(object, padding, padding);
                if visible == object.visible {
                    continue;
                }
                object.visible = visible;
                if let Some(handle) = object.surface {
                    self.surfaces.set_visible(handle, visible);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use crate::core::camera::Camera;
    use crate::core::error::EngineError;
    use crate::core::geometry::Size;
    use crate::core::object::GameObject;
    use crate::core::scene::Scene;

    fn scene() -> Scene {
        Scene::new(Size::new(800, 600)).with_camera(Camera::new(Size::new(800, 600)))
    }

    #[test]
    fn chunks_line_up_on_the_floor() {
        let mut scene = scene();
        let platform = scene.create_platform(100);

        let a = scene.add_chunk(platform, GameObject::new(64, 32)).unwrap();
        let b = scene.add_chunk(platform, GameObject::new(64, 48).with_z(3)).unwrap();

        let a = scene.object(a).unwrap();
        let b = scene.object(b).unwrap();
        assert_eq!((a.x(), a.y()), (100, 568));
        assert_eq!((b.x(), b.y(), b.z()), (164, 552, 0));
        assert!(b.has_collision());
        assert_eq!(scene.platform(platform).unwrap().width(), 128);
    }

    #[test]
    fn chunk_without_size_is_rejected() {
        let mut scene = scene();
        let platform = scene.create_platform(0);

        let flat = GameObject::new(64, 0);
        let flat_id = flat.id();
        assert_eq!(scene.add_chunk(platform, flat), Err(EngineError::MissingHeight(flat_id)));

        let thin = GameObject::new(0, 10);
        let thin_id = thin.id();
        assert_eq!(scene.add_chunk(platform, thin), Err(EngineError::MissingWidth(thin_id)));
        assert!(scene.objects().is_empty());
    }

    #[test]
    fn foreign_platform_is_rejected() {
        let mut ours = scene();
        let mut theirs = scene();
        let platform = theirs.create_platform(0);

        let result = ours.add_chunk(platform, GameObject::new(10, 10));
        assert!(matches!(result, Err(EngineError::ForeignPlatform { .. })));
    }

    #[test]
    fn long_platform_grows_stage_and_hides_far_chunks() {
        let mut scene = scene();
        let platform = scene.create_platform(0);
        let mut last = None;
        for _ in 0..20 {
            last = Some(scene.add_chunk(platform, GameObject::new(100, 20)).unwrap());
        }

        assert_eq!(scene.stage().width, 2000);
        let far = scene.object(last.unwrap()).unwrap();
        assert!(!far.is_visible());

        scene.update_camera(|camera| camera.set_x(1200));
        assert!(scene.object(last.unwrap()).unwrap().is_visible());
        let first = scene.platform(platform).unwrap().chunks()[0];
        assert!(!scene.object(first).unwrap().is_visible());
    }

    #[test]
    fn platform_shift_keeps_chunks_together() {
        let mut scene = scene();
        let platform = scene.create_platform(0);
        let a = scene.add_chunk(platform, GameObject::new(100, 20)).unwrap();
        let b = scene.add_chunk(platform, GameObject::new(100, 20)).unwrap();

        assert_eq!(scene.set_platform_x(platform, 50), Ok(0));
        assert_eq!(scene.object(a).unwrap().x(), 50);
        assert_eq!(scene.object(b).unwrap().x(), 150);

        assert_eq!(scene.set_platform_x(platform, 10), Ok(0));
        assert_eq!(scene.object(a).unwrap().x(), 10);
        assert_eq!(scene.object(b).unwrap().x(), 110);
        assert_eq!(scene.platform(platform).unwrap().x(), 10);
    }

    #[test]
    fn blocked_chunks_stay_and_are_counted() {
        let mut scene = scene();
        let platform = scene.create_platform(0);
        let a = scene.add_chunk(platform, GameObject::new(100, 20)).unwrap();
        let b = scene.add_chunk(platform, GameObject::new(100, 20)).unwrap();
        scene.add_object(GameObject::new(20, 40).at(390, 560).with_collision(true));

        assert_eq!(scene.set_platform_x(platform, 200), Ok(2));
        assert_eq!(scene.object(a).unwrap().x(), 0);
        assert_eq!(scene.object(b).unwrap().x(), 100);
        assert_eq!(scene.platform(platform).unwrap().x(), 200);
    }
}
