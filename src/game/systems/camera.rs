use crate::game::constants::camera::*;
use crate::game::state::World;
use crate::util::lerp;

/// Zoom the camera should settle at for a given total mass
pub fn target_zoom(total_mass: f32) -> f32 {
    (1.0 - (total_mass - ZOOM_REFERENCE_MASS) / ZOOM_MASS_RANGE).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Ease the camera toward the player centroid and mass-derived zoom
pub fn update(world: &mut World) {
    let centroid = world.player.centroid();
    let zoom = target_zoom(world.player.total_mass());
    let camera = &mut world.camera;
    camera.position = camera.position.lerp(centroid, POSITION_LERP);
    camera.zoom = lerp(camera.zoom, zoom, ZOOM_LERP);
}
