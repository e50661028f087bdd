use bevy::prelude::*;
use bevy_marching_squares::{Decider, Field, MarchingSquaresPlugin, types::Point};

const RESOLUTION: usize = 64;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, MarchingSquaresPlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, controls)
        .run();
}

fn setup(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    bevy::log::info!("Isoline Example: Up/Down change the isovalue, D toggles the decider");

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // two overlapping blobs so saddles show up between them
    let function = |p: Point| {
        let a = (p.x + 0.35).hypot(p.y - 0.1);
        let b = (p.x - 0.35).hypot(p.y + 0.1);
        let v = (-4.0 * a * a).exp() + (-4.0 * b * b).exp();
        (v * 160.0).clamp(0.0, 255.0) as u8
    };

    commands.spawn((
        Field::new(RESOLUTION, RESOLUTION)
            .fill(&function)
            .with_isovalue(100),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..Default::default()
        })),
    ));
}

fn controls(keyboard: Res<ButtonInput<KeyCode>>, mut query: Query<&mut Field>) {
    for mut field in query.iter_mut() {
        if keyboard.just_pressed(KeyCode::ArrowUp) {
            field.isovalue = field.isovalue.saturating_add(5);
        }
        if keyboard.just_pressed(KeyCode::ArrowDown) {
            field.isovalue = field.isovalue.saturating_sub(5);
        }
        if keyboard.just_pressed(KeyCode::KeyD) {
            field.decider = field.decider.toggled();
        }
        if keyboard.get_just_pressed().next().is_some() {
            let asymptotic = field.decider == Decider::Asymptotic;
            bevy::log::info!("isovalue {} asymptotic {}", field.isovalue, asymptotic);
        }
    }
}
