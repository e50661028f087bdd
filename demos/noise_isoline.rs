use bevy::prelude::*;
use bevy_marching_squares::{Field, MarchingSquaresPlugin};
use noiz::prelude::*;

const FIELD_SIZE: usize = 128;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, MarchingSquaresPlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, sweep)
        .run();
}

fn setup(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let mut noise = Noise::<
        LayeredNoise<
            Normed<f32>,
            Persistence,
            Octave<MixCellGradients<OrthoGrid, Smoothstep, QuickGradients>>,
        >,
    >::default();
    noise.set_frequency(0.04);

    let mut field = Field::new(FIELD_SIZE, FIELD_SIZE);
    field.for_each_sample(|x, y, value| {
        let n: f32 = noise.sample_for(Vec2::new(x as f32, y as f32));
        *value = ((n + 1.0) * 0.5 * 255.0).clamp(0.0, 255.0) as u8;
    });

    commands.spawn((
        field,
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1., 0.6, 0.),
            unlit: true,
            ..Default::default()
        })),
    ));
}

/// Slowly sweeps the isovalue so every frame re-queues the field.
fn sweep(time: Res<Time>, mut query: Query<&mut Field>) {
    let isovalue = (128.0 + 100.0 * (time.elapsed_secs() * 0.5).sin()) as u8;
    for mut field in query.iter_mut() {
        if field.isovalue != isovalue {
            field.isovalue = isovalue;
        }
    }
}
