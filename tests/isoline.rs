use bevy::math::Vec2;
use bevy_marching_squares::{
    Decider, Field, Isoline, ScalarField,
    cell::Cell,
    extract,
    isoline::march_cell,
    types::{Intensity, Point, Value},
};
use ndarray::Array2;
use noiz::prelude::*;

const EPS: Value = 1e-2;

fn near(p: Point, x: Value, y: Value) -> bool {
    (p.x - x).abs() < EPS && (p.y - y).abs() < EPS
}

fn noise_field(width: usize, height: usize, frequency: f32) -> Field {
    let mut noise = Noise::<
        LayeredNoise<
            Normed<f32>,
            Persistence,
            Octave<MixCellGradients<OrthoGrid, Smoothstep, QuickGradients>>,
        >,
    >::default();
    noise.set_frequency(frequency);

    let mut field = Field::new(width, height);
    field.for_each_sample(|x, y, value| {
        let n: f32 = noise.sample_for(Vec2::new(x as f32, y as f32));
        *value = ((n + 1.0) * 0.5 * 255.0).clamp(0.0, 255.0) as Intensity;
    });
    field
}

/// Cells in traversal order, built the same way [`extract`] builds them.
fn cells(field: &Field) -> Vec<Cell> {
    let (w, h) = (field.width(), field.height());
    let half = [1.0 / w as Value, 1.0 / h as Value];
    let mut out = Vec::new();
    for y in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
            let center = Point::new(
                -1.0 + 2.0 * (x + 1) as Value / w as Value,
                -1.0 + 2.0 * (y + 1) as Value / h as Value,
            );
            out.push(Cell::sample(field, center, half));
        }
    }
    out
}

fn sorted(isoline: &Isoline) -> Vec<(Value, Value)> {
    let mut v: Vec<_> = isoline.vertices().iter().map(|p| (p.x, p.y)).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

#[test]
fn uniform_fields_have_no_isoline() {
    let below = Field::from_vec(4, 3, vec![10; 12]).unwrap();
    let above = Field::from_vec(4, 3, vec![200; 12]).unwrap();
    for decider in [Decider::Midpoint, Decider::Asymptotic] {
        assert!(extract(&below, 128, decider).is_empty());
        assert!(extract(&above, 128, decider).is_empty());
    }
}

#[test]
fn uniform_ten_at_128_yields_zero_vertices() {
    let field = Field::from_vec(16, 16, vec![10; 256]).unwrap();
    assert_eq!(extract(&field, 128, Decider::Midpoint).vertices().len(), 0);
}

#[test]
fn single_straddling_corner_gives_one_segment() {
    // up-right corner above, the rest background
    let field = Field::from_vec(2, 2, vec![0, 0, 0, 200]).unwrap();
    let isoline = extract(&field, 100, Decider::Midpoint);
    assert_eq!(isoline.len(), 1);

    let (a, b) = isoline.segments().next().unwrap();
    // top edge (y = 0.5) then right edge (x = 0.5), each halfway
    assert!(near(a, 0.0, 0.5));
    assert!(near(b, 0.5, 0.0));
}

#[test]
fn isolated_peak_is_enclosed() {
    let mut field = Field::new(3, 3);
    field.set(1, 1, 255);
    let isoline = extract(&field, 128, Decider::Midpoint);
    // one segment from each of the four cells around the peak
    assert_eq!(isoline.len(), 4);
    for p in isoline.vertices() {
        assert!(p.x.abs() < 0.7 && p.y.abs() < 0.7);
    }
}

#[test]
fn checkerboard_saddle_hits_edge_midpoints() {
    // bottom row [0, 255], top row [255, 0]
    let field = Field::from_vec(2, 2, vec![0, 255, 255, 0]).unwrap();
    let midpoints = [(0.0, 0.5), (0.5, 0.0), (0.0, -0.5), (-0.5, 0.0)];

    for decider in [Decider::Midpoint, Decider::Asymptotic] {
        let isoline = extract(&field, 128, decider);
        assert_eq!(isoline.len(), 2);
        assert_eq!(isoline.vertices().len(), 4);
        for (x, y) in midpoints {
            assert!(
                isoline.vertices().iter().any(|p| near(*p, x, y)),
                "{decider:?} misses ({x}, {y})"
            );
        }
    }
}

#[test]
fn checkerboard_pairings() {
    let field = Field::from_vec(2, 2, vec![0, 255, 255, 0]).unwrap();

    // mean 127.5 < 128 sides with the low corners: top-left and right-bottom
    let v = extract(&field, 128, Decider::Midpoint).into_vertices();
    assert!(near(v[0], 0.0, 0.5) && near(v[1], -0.5, 0.0));
    assert!(near(v[2], 0.5, 0.0) && near(v[3], 0.0, -0.5));

    // left crossing sits just above the centered saddle
    let v = extract(&field, 128, Decider::Asymptotic).into_vertices();
    assert!(near(v[0], -0.5, 0.0) && near(v[1], 0.0, 0.5));
    assert!(near(v[2], 0.5, 0.0) && near(v[3], 0.0, -0.5));
}

#[test]
fn too_small_fields_are_empty() {
    for (w, h) in [(0, 0), (1, 1), (1, 5), (5, 1), (0, 4)] {
        let field = Field::new(w, h).fill(&|p: Point| -> Intensity {
            if p.x > 0.0 { 255 } else { 0 }
        });
        assert!(extract(&field, 128, Decider::Asymptotic).is_empty());
    }
}

#[test]
fn extreme_isovalues() {
    let field = Field::from_vec(2, 2, vec![0, 17, 254, 255]).unwrap();
    // everything is at or above 0
    assert!(extract(&field, 0, Decider::Midpoint).is_empty());
    // only the 255 sample reaches 255
    assert_eq!(extract(&field, 255, Decider::Midpoint).len(), 1);
}

#[test]
fn vertex_count_is_even_and_stays_in_range() {
    let field = noise_field(64, 48, 0.15);
    for isovalue in [32, 100, 128, 180] {
        let isoline = extract(&field, isovalue, Decider::Asymptotic);
        assert_eq!(isoline.vertices().len() % 2, 0);
        for p in isoline.vertices() {
            assert!((-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y));
        }
    }
}

#[test]
fn vertices_stay_inside_their_cell() {
    let field = noise_field(40, 40, 0.2);
    for decider in [Decider::Midpoint, Decider::Asymptotic] {
        for cell in cells(&field) {
            let mut out = Isoline::new_empty();
            march_cell(&cell, 128, decider, &mut out);

            let (min_x, max_x) = (cell.down_left.pos.x, cell.down_right.pos.x);
            let (min_y, max_y) = (cell.down_left.pos.y, cell.up_left.pos.y);
            for p in out.vertices() {
                assert!(p.x >= min_x - 1e-5 && p.x <= max_x + 1e-5);
                assert!(p.y >= min_y - 1e-5 && p.y <= max_y + 1e-5);
            }
        }
    }
}

#[test]
fn decider_only_changes_pairing() {
    let field = noise_field(48, 48, 0.3);
    let midpoint = extract(&field, 128, Decider::Midpoint);
    let asymptotic = extract(&field, 128, Decider::Asymptotic);

    assert_eq!(midpoint.len(), asymptotic.len());
    assert_eq!(sorted(&midpoint), sorted(&asymptotic));
}

#[test]
fn parallel_rows_keep_sequential_order() {
    let field = noise_field(50, 30, 0.25);
    let mut sequential = Isoline::new_empty();
    for cell in cells(&field) {
        march_cell(&cell, 90, Decider::Asymptotic, &mut sequential);
    }
    assert_eq!(extract(&field, 90, Decider::Asymptotic), sequential);
}

#[test]
fn raw_arrays_are_fields() {
    let values = Array2::from_shape_vec((2, 3), vec![0, 0, 0, 0, 200, 0]).unwrap();
    assert_eq!(values.width(), 3);
    assert_eq!(values.height(), 2);
    let isoline = extract(&values, 100, Decider::Midpoint);
    // the 200 sample is a lone corner in both cells
    assert_eq!(isoline.len(), 2);
}
