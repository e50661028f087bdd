use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};
use bevy_marching_squares::{
    ascii::{Ramp, to_ascii},
    filter::{Kernel, Weights, apply, to_grayscale},
    image::Image as Raster,
};

const SIZE: usize = 512;

#[derive(Resource)]
struct Sandbox {
    raster: Raster,
    texture: Handle<Image>,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup)
        .add_systems(Update, keyboard)
        .run();
}

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    bevy::log::info!(
        "Image Processing: G/H grayscale, M mean, A/B sobel, R reset, T export ascii.txt"
    );

    let raster = Raster::gradient(SIZE, SIZE);
    let texture = images.add(to_texture(&raster));

    commands.spawn(Camera2d);
    commands.spawn(Sprite::from_image(texture.clone()));
    commands.insert_resource(Sandbox { raster, texture });
}

fn keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut sandbox: ResMut<Sandbox>,
    mut images: ResMut<Assets<Image>>,
    mut exit: MessageWriter<AppExit>,
) {
    let raster = &mut sandbox.raster;
    let mut dirty = true;

    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
        return;
    } else if keys.just_pressed(KeyCode::KeyM) {
        match Kernel::mean(3, 3) {
            Ok(kernel) => apply(raster, &kernel),
            Err(e) => bevy::log::error!("{e}"),
        }
    } else if keys.just_pressed(KeyCode::KeyA) {
        apply(raster, &Kernel::sobel_x());
    } else if keys.just_pressed(KeyCode::KeyB) {
        apply(raster, &Kernel::sobel_y());
    } else if keys.just_pressed(KeyCode::KeyG) || keys.just_pressed(KeyCode::KeyH) {
        let weights = if keys.just_pressed(KeyCode::KeyG) {
            Weights::Luma
        } else {
            Weights::Uniform
        };
        if let Err(e) = to_grayscale(raster, weights) {
            bevy::log::error!("{e}");
        }
    } else if keys.just_pressed(KeyCode::KeyR) {
        *raster = Raster::gradient(SIZE, SIZE);
    } else if keys.just_pressed(KeyCode::KeyT) {
        dirty = false;
        match std::fs::write("ascii.txt", to_ascii(raster, Ramp::Short)) {
            Ok(()) => bevy::log::info!("wrote ascii.txt"),
            Err(e) => bevy::log::error!("could not write ascii.txt: {e}"),
        }
    } else {
        dirty = false;
    }

    if dirty {
        let texture = to_texture(&sandbox.raster);
        if let Some(image) = images.get_mut(&sandbox.texture) {
            *image = texture;
        }
    }
}

/// Copies a raster into an RGBA texture, flipping it so row `0` ends up at the bottom.
fn to_texture(raster: &Raster) -> Image {
    let (width, height, channels) = (raster.width(), raster.height(), raster.channels());
    let mut data = Vec::with_capacity(width * height * 4);
    for y in (0..height).rev() {
        for x in 0..width {
            for c in 0..4 {
                data.push(if c < channels { raster.get(x, y, c) } else { 255 });
            }
        }
    }
    Image::new(
        Extent3d {
            width: width as u32,
            height: height as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}
