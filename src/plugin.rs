use std::sync::Arc;

use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};
use ndarray::Array2;

use crate::{
    field::Field,
    isoline::{Decider, extract},
    mesh::GeneratedIsoline,
    types::Intensity,
};

/// System sets for the marching squares pipeline.
///
/// Use these to order your own systems relative to isoline generation:
///
/// ```rust,ignore
/// // Run after the line list is ready but before it's uploaded:
/// app.add_systems(Update, export_segments.after(MarchingSquaresSet::Generate)
///                                        .before(MarchingSquaresSet::Upload));
/// ```
///
/// ```text
/// MarchingSquaresSet::Spawn  →  [async compute]  →  MarchingSquaresSet::Generate  →  [your systems]  →  MarchingSquaresSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarchingSquaresSet {
    /// Spawns an async compute task for each queued field.
    Spawn,
    /// Polls async tasks and inserts [`GeneratedIsoline`] on completion.
    Generate,
    /// Uploads [`GeneratedIsoline`] data into a Bevy [`Mesh3d`].
    Upload,
}

/// Marker component added to [`Field`] entities whose isoline is out of date.
///
/// Removed automatically once the isoline has been generated and uploaded.
#[derive(Component)]
pub struct QueuedField;

/// Holds the in-flight async compute task for a [`Field`].
#[derive(Component)]
pub struct ComputeTask(Task<GeneratedIsoline>);

/// Runtime configuration for the marching squares pipeline.
///
/// Inserted as a resource by [`MarchingSquaresPlugin`]. Modify it at any time to change behaviour:
///
/// ```rust,ignore
/// app.add_plugins(MarchingSquaresPlugin { max_tasks_per_frame: 8 });
///
/// fn my_system(mut config: ResMut<MarchingSquaresConfig>) {
///     config.max_tasks_per_frame = 1;
/// }
/// ```
#[derive(Resource)]
pub struct MarchingSquaresConfig {
    /// Maximum number of async extraction tasks spawned per frame. Default: `4`.
    pub max_tasks_per_frame: usize,
}

impl Default for MarchingSquaresConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: 4,
        }
    }
}

/// Bevy plugin that keeps a line-list mesh in sync with every [`Field`].
///
/// When the `auto_queue` feature is enabled, any [`Field`] that is added or changed
/// (new samples, isovalue or decider) is re-contoured on Bevy's `AsyncComputeTaskPool`:
///
/// ```text
/// Field added / changed
///   → QueuedField inserted           (queue_changed_fields)
///   → ComputeTask spawned            (MarchingSquaresSet::Spawn)
///   → [async compute runs]
///   → GeneratedIsoline inserted      (MarchingSquaresSet::Generate, once task completes)
///   → Mesh3d inserted                (MarchingSquaresSet::Upload)
///   → QueuedField removed
/// ```
pub struct MarchingSquaresPlugin {
    /// Initial value for [`MarchingSquaresConfig::max_tasks_per_frame`].
    pub max_tasks_per_frame: usize,
}

impl Default for MarchingSquaresPlugin {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: MarchingSquaresConfig::default().max_tasks_per_frame,
        }
    }
}

impl Plugin for MarchingSquaresPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MarchingSquaresConfig {
            max_tasks_per_frame: self.max_tasks_per_frame,
        });

        #[cfg(feature = "auto_queue")]
        app.configure_sets(
            Update,
            (
                MarchingSquaresSet::Spawn,
                MarchingSquaresSet::Generate,
                MarchingSquaresSet::Upload,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                queue_changed_fields.before(MarchingSquaresSet::Spawn),
                spawn_isoline_tasks.in_set(MarchingSquaresSet::Spawn),
                poll_isoline_tasks.in_set(MarchingSquaresSet::Generate),
                upload_isoline.in_set(MarchingSquaresSet::Upload),
            ),
        );
    }
}

/// Inserts [`QueuedField`] on every added or modified [`Field`].
///
/// A field that changes while its task is still in flight drops that task (cancelling
/// it) along with any result not yet uploaded, so the next spawn sees the new samples.
fn queue_changed_fields(mut commands: Commands, query: Query<Entity, Changed<Field>>) {
    for entity in query.iter() {
        commands
            .entity(entity)
            .insert(QueuedField)
            .remove::<(ComputeTask, GeneratedIsoline)>();
    }
}

/// Spawns async compute tasks for [`QueuedField`]s, up to [`MarchingSquaresConfig::max_tasks_per_frame`] per frame.
fn spawn_isoline_tasks(
    mut commands: Commands,
    config: Res<MarchingSquaresConfig>,
    query: Query<
        (Entity, &Field),
        (With<QueuedField>, Without<ComputeTask>, Without<GeneratedIsoline>),
    >,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for (entity, field) in query.iter().take(config.max_tasks_per_frame) {
        // Arc::clone shares the samples with the task without copying them.
        let values: Arc<Array2<Intensity>> = Arc::clone(&field.values);
        let isovalue = field.isovalue;
        let decider = field.decider;

        let task =
            task_pool.spawn(async move { run_marching_squares(&values, isovalue, decider) });

        commands.entity(entity).insert(ComputeTask(task));
    }
}

/// Polls in-flight [`ComputeTask`]s each frame and inserts [`GeneratedIsoline`] on completion.
///
/// Non-blocking: tasks that haven't finished are skipped and retried next frame.
fn poll_isoline_tasks(mut commands: Commands, mut query: Query<(Entity, &mut ComputeTask)>) {
    for (entity, mut compute_task) in query.iter_mut() {
        if let Some(generated) = block_on(future::poll_once(&mut compute_task.0)) {
            commands
                .entity(entity)
                .insert(generated)
                .remove::<ComputeTask>();
        }
    }
}

/// Uploads a [`GeneratedIsoline`] into a Bevy [`Mesh3d`] with [`PrimitiveTopology::LineList`],
/// then removes [`GeneratedIsoline`] and [`QueuedField`].
///
/// An existing [`Mesh3d`] on the entity is replaced.
fn upload_isoline(
    mut commands: Commands,
    query: Query<(Entity, &GeneratedIsoline), With<QueuedField>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, generated) in query.iter() {
        let mut bevy_mesh = Mesh::new(
            PrimitiveTopology::LineList,
            RenderAssetUsages::RENDER_WORLD,
        );

        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, generated.vertices.clone());
        bevy_mesh.insert_indices(Indices::U32(generated.indices.clone()));

        tracing::debug!(
            "uploaded isoline with {} segments for {entity}",
            generated.segment_count()
        );

        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(bevy_mesh)))
            .remove::<(GeneratedIsoline, QueuedField)>();
    }
}

/// Runs marching squares over `values` and packs the result for upload.
fn run_marching_squares(
    values: &Array2<Intensity>,
    isovalue: Intensity,
    decider: Decider,
) -> GeneratedIsoline {
    let isoline = extract(values, isovalue, decider);
    GeneratedIsoline::build(&isoline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_inserts_config() {
        let mut app = App::new();
        app.add_plugins(MarchingSquaresPlugin {
            max_tasks_per_frame: 2,
        });
        let config = app.world().resource::<MarchingSquaresConfig>();
        assert_eq!(config.max_tasks_per_frame, 2);
    }

    #[test]
    fn changed_field_is_queued() {
        let mut app = App::new();
        app.add_systems(Update, queue_changed_fields);

        let entity = app.world_mut().spawn(Field::new(4, 4)).id();
        app.update();
        assert!(app.world().entity(entity).contains::<QueuedField>());

        app.world_mut().entity_mut(entity).remove::<QueuedField>();
        app.update();
        assert!(!app.world().entity(entity).contains::<QueuedField>());

        if let Some(mut field) = app.world_mut().get_mut::<Field>(entity) {
            field.isovalue = 10;
        }
        app.update();
        assert!(app.world().entity(entity).contains::<QueuedField>());
    }

    #[test]
    fn task_output_matches_direct_extraction() {
        let values = Array2::from_shape_vec((2, 2), vec![0, 255, 255, 0]).unwrap();
        let generated = run_marching_squares(&values, 128, Decider::Asymptotic);
        assert_eq!(generated.segment_count(), 2);
        assert_eq!(generated.vertices.len(), 4);
    }
}
