// main.rs
//
// Walk-through of the reprimitive pipeline on a small scene: build a few
// primitives, bake one's rotation, recover everything and rebuild.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use reprimitive::params::{ConeParams, CylinderParams, TorusDimensions, TorusParams};
use reprimitive::scene::{Modifier, ModifierKind, Transform};
use reprimitive::{
    EditSession, FillType, PrimitiveParams, ReprimitiveError, Scene, StandardGenerator, analyze,
    fix_applied_rotation, tweak_primitive,
};

fn init_logging() {
    let filter = "reprimitive=info";
    if std::env::var("RUST_LOG").is_err() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    } else {
        env_logger::init();
    }
}

fn main() -> Result<(), ReprimitiveError> {
    init_logging();
    let generator = StandardGenerator;
    let mut scene = Scene::new();

    // 1) a cylinder carrying a bevel modifier
    let cylinder = scene.add_primitive(
        &generator,
        &PrimitiveParams::Cylinder(CylinderParams {
            vertices: 8,
            radius: 1.0,
            depth: 2.0,
            fill: FillType::NGon,
            loop_cuts: vec![],
        }),
        Transform::from_location_rotation(
            Point3::new(3.0, 0.0, 1.0),
            UnitQuaternion::from_euler_angles(0.2, 0.0, 0.6),
        ),
        false,
    )?;
    scene
        .object_mut(cylinder)?
        .modifiers
        .push(Modifier::new("Bevel", ModifierKind::Bevel));

    // 2) recover and widen it
    let widened = tweak_primitive(&mut scene, &generator, cylinder, |params| {
        if let PrimitiveParams::Cylinder(c) = params {
            c.radius = 2.0;
        }
    })?;
    if let Some(id) = widened {
        println!("cylinder rebuilt as {id}: {:?}", analyze(scene.mesh(id)?)?);
    }

    // 3) a torus whose rotation was applied to the vertices
    let torus = scene.add_primitive(
        &generator,
        &PrimitiveParams::Torus(TorusParams {
            major_segments: 24,
            minor_segments: 8,
            major_radius: 1.0,
            minor_radius: 0.25,
            mode: TorusDimensions::MajorMinor,
        }),
        Transform::from_location_rotation(
            Point3::new(-2.0, 1.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5),
        ),
        false,
    )?;
    scene.apply_transform(torus, false, true, false)?;
    if let Some(id) = fix_applied_rotation(&mut scene, &generator, torus)? {
        let rotation = scene.object(id)?.transform.rotation;
        println!("torus rotation restored: {:?}", rotation.euler_angles());
    }

    // 4) an interactive edit of a sharp cone that ends up cancelled
    let cone = scene.add_primitive(
        &generator,
        &PrimitiveParams::Cone(ConeParams {
            vertices: 16,
            radius_bottom: 1.0,
            radius_top: 0.0,
            depth: 2.0,
            fill: FillType::TriangleFan,
            loop_cuts: vec![0.5],
        }),
        Transform::from_location_rotation(Point3::new(0.0, -3.0, 0.0), UnitQuaternion::identity()),
        false,
    )?;
    if let Some(mut session) = EditSession::begin(&mut scene, &generator, cone)? {
        println!("cone recovered as {:?}", session.params());
        let mut taller = session.params().clone();
        if let PrimitiveParams::Cone(c) = &mut taller {
            c.depth = 4.0;
        }
        session.preview(&mut scene, taller)?;
        let restored = session.cancel(&mut scene)?;
        println!(
            "cone restored as {restored}, last preview {:?}",
            session.last_preview()
        );
    }

    println!("{} objects in scene", scene.len());
    Ok(())
}
