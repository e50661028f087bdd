use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
    window::PrimaryWindow,
};
use bevy_marching_squares::color::{picker_image, picker_rgb};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

#[derive(Component)]
struct Readout;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Color Picker".into(),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup)
        .add_systems(Update, pick)
        .run();
}

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    window: Single<&Window, With<PrimaryWindow>>,
) {
    let picker = picker_image(WIDTH, HEIGHT);
    let mut data = Vec::with_capacity(WIDTH * HEIGHT * 4);
    for y in (0..HEIGHT).rev() {
        for x in 0..WIDTH {
            for c in 0..4 {
                data.push(picker.get(x, y, c));
            }
        }
    }
    let texture = images.add(Image::new(
        Extent3d {
            width: WIDTH as u32,
            height: HEIGHT as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    ));

    commands.spawn(Camera2d);
    commands.spawn(Sprite {
        image: texture,
        custom_size: Some(Vec2::new(window.width(), window.height())),
        ..default()
    });
    commands.spawn((
        Readout,
        Text::new(""),
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));
}

fn pick(
    window: Single<&Window, With<PrimaryWindow>>,
    mut readout: Single<&mut Text, With<Readout>>,
) {
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let x = cursor.x / window.width();
    let y = 1.0 - cursor.y / window.height();
    let [r, g, b] = picker_rgb(x, y);
    readout.0 = format!(
        "HSV: ({:.1}, {:.2}, 1.00)  RGB: ({r:.2}, {g:.2}, {b:.2})",
        x * 360.0,
        y
    );
}
