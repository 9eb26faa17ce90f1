mod support;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use reprimitive::{
    FillType, GeneratorError, PrimitiveParams, ReprimitiveError, Scene, StandardGenerator, analyze,
    replace::{AlignMode, ReplaceRequest, replace},
    scene::{Modifier, ModifierKind, Object, ObjectId, PropertyValue, Transform},
    tweak_primitive,
};
use support::*;

struct Fixture {
    scene: Scene,
    parent: ObjectId,
    cylinder: ObjectId,
    child: ObjectId,
    user: ObjectId,
}

/// A cylinder under a rotated parent, with a child, modifiers, materials,
/// properties, a custom collection and another object's modifier aimed at it.
fn fixture() -> Fixture {
    let mut scene = Scene::new();
    let parent = scene
        .add_object(Object::new("Rig", None).with_transform(placed(0.0, 0.0, 1.0, 0.0, 0.0, 0.8)));
    let cylinder = scene
        .add_primitive(
            &StandardGenerator,
            &cylinder(8, 1.0, 2.0, FillType::NGon),
            placed(2.0, 1.0, 0.0, 0.4, 0.0, 0.0),
            false,
        )
        .expect("add cylinder");
    scene.reparent_keep_transform(cylinder, Some(parent)).expect("parent");

    let child = scene
        .add_primitive(
            &StandardGenerator,
            &uv_sphere(8, 4, 0.2),
            placed(2.0, 1.0, 2.0, 0.0, 0.0, 0.0),
            false,
        )
        .expect("add child");
    scene.reparent_keep_transform(child, Some(cylinder)).expect("child");

    let mut user = Object::new("Cutter", None);
    let mut boolean = Modifier::new("Boolean", ModifierKind::Boolean);
    boolean.target = Some(cylinder);
    user.modifiers.push(boolean);
    let user = scene.add_object(user);

    let object = scene.object_mut(cylinder).expect("cylinder");
    let mut bevel = Modifier::new("Bevel", ModifierKind::Bevel);
    bevel.settings.insert("width".to_string(), 0.05);
    object.modifiers.push(bevel);
    object.modifiers.push(Modifier::new("Weld", ModifierKind::Unknown("WELD".to_string())));
    object.materials.push("Steel".to_string());
    object
        .custom_properties
        .insert("part_number".to_string(), PropertyValue::Int(42));
    object
        .custom_properties
        .insert("_cache".to_string(), PropertyValue::Bool(true));
    object.collections.clear();
    object.collections.insert("Parts".to_string());
    if let Some(mesh) = object.mesh.as_mut() {
        mesh.set_smooth(true);
    }

    Fixture {
        scene,
        parent,
        cylinder,
        child,
        user,
    }
}

#[test]
fn widened_cylinder_keeps_place_and_linkage() {
    let Fixture {
        mut scene,
        parent,
        cylinder,
        child,
        user,
    } = fixture();
    let location_before = scene.world_location(cylinder).expect("location");
    let parent_inverse = scene.object(cylinder).expect("object").parent_inverse;
    let child_world = scene.world_matrix(child).expect("child");
    let count = scene.len();

    let original = analyze(scene.mesh(cylinder).expect("mesh")).expect("analyze");
    assert!(original.approx_eq(&support::cylinder(8, 1.0, 2.0, FillType::NGon)));

    let rebuilt = tweak_primitive(&mut scene, &StandardGenerator, cylinder, |params| {
        if let PrimitiveParams::Cylinder(c) = params {
            c.radius = 2.0;
        }
    })
    .expect("tweak")
    .expect("cylinder");

    assert_ne!(rebuilt, cylinder);
    assert!(!scene.contains(cylinder));
    assert_eq!(scene.len(), count);

    let params = analyze(scene.mesh(rebuilt).expect("mesh")).expect("analyze");
    assert!(params.approx_eq(&support::cylinder(8, 2.0, 2.0, FillType::NGon)), "{params:?}");
    let location_after = scene.world_location(rebuilt).expect("location");
    assert!((location_after - location_before).norm() < 1e-9);

    // every cap vertex sits 2.0 from the world-space axis through the origin
    let world = scene.world_matrix(rebuilt).expect("world");
    let axis = world.transform_vector(&Vector3::z()).normalize();
    for p in scene.world_vertices(rebuilt).expect("vertices") {
        let offset = p - location_after;
        let radial = offset - axis * offset.dot(&axis);
        assert!(approx_eq(radial.norm(), 2.0, 1e-9));
    }

    let object = scene.object(rebuilt).expect("object");
    assert_eq!(object.name, "Cylinder");
    assert_eq!(object.parent, Some(parent));
    assert_eq!(object.parent_inverse, parent_inverse);
    assert_eq!(object.materials, vec!["Steel".to_string()]);
    assert_eq!(object.modifiers.len(), 2);
    assert_eq!(object.modifiers[0].settings.get("width"), Some(&0.05));
    assert!(object.modifiers[1].settings.is_empty());
    assert_eq!(object.collections.iter().collect::<Vec<_>>(), vec!["Parts"]);
    assert_eq!(
        object.custom_properties.get("part_number"),
        Some(&PropertyValue::Int(42))
    );
    assert!(!object.custom_properties.contains_key("_cache"));
    assert!(object.is_smooth());

    assert_eq!(scene.object(child).expect("child").parent, Some(rebuilt));
    let child_after = scene.world_matrix(child).expect("child");
    assert!((child_after - child_world).norm() < 1e-9);
    assert_eq!(scene.object(user).expect("user").modifiers[0].target, Some(rebuilt));
}

#[test]
fn invalid_parameters_leave_the_scene_alone() {
    let Fixture {
        mut scene, cylinder, ..
    } = fixture();
    let mesh = scene.mesh(cylinder).expect("mesh").clone();
    let count = scene.len();

    let request = ReplaceRequest::new(
        support::cylinder(2, 1.0, 2.0, FillType::NGon),
        Point3::origin(),
        UnitQuaternion::identity(),
    );
    let result = replace(&mut scene, &StandardGenerator, cylinder, &request);
    assert_eq!(
        result,
        Err(ReprimitiveError::GeneratorRejection(GeneratorError::TooFewSegments {
            field: "vertices",
            min: 3,
            value: 2,
        }))
    );
    assert_eq!(scene.len(), count);
    let after = scene.mesh(cylinder).expect("mesh");
    assert_eq!(after.vertices.len(), mesh.vertices.len());
    assert_eq!(after.faces.len(), mesh.faces.len());

    let result = tweak_primitive(&mut scene, &StandardGenerator, cylinder, |params| {
        if let PrimitiveParams::Cylinder(c) = params {
            c.vertices = 2;
        }
    });
    assert!(matches!(result, Err(ReprimitiveError::GeneratorRejection(_))));
    assert!(scene.contains(cylinder));
    assert_eq!(scene.mesh(cylinder).expect("mesh").faces.len(), mesh.faces.len());
}

#[test]
fn cursor_alignment_and_origin_restore() {
    let mut scene = Scene::new();
    scene.cursor_rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
    let id = scene
        .add_primitive(
            &StandardGenerator,
            &torus(16, 6, 1.0, 0.2),
            Transform::default(),
            false,
        )
        .expect("add");

    let mut request = ReplaceRequest::new(
        torus(24, 8, 1.0, 0.2),
        Point3::new(1.0, 0.0, 0.0),
        UnitQuaternion::identity(),
    );
    request.align = AlignMode::Cursor;
    request.origin = Some(Point3::new(0.0, 0.0, 0.0));
    let rebuilt = replace(&mut scene, &StandardGenerator, id, &request).expect("replace");

    let object = scene.object(rebuilt).expect("object");
    assert_eq!(object.transform.rotation, scene.cursor_rotation);
    assert!(scene.world_location(rebuilt).expect("location").coords.norm() < 1e-9);
    let median = scene
        .world_vertices(rebuilt)
        .expect("vertices")
        .iter()
        .fold(Vector3::zeros(), |sum, p| sum + p.coords)
        / (24.0 * 8.0);
    assert!((median - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
}
