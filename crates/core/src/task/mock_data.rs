use super::Task;

/// Sample tasks used to seed the simulated remote data source.
///
/// Ids are fixed so seeding twice yields the same tasks.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("Build tower in Pisa", "Ground looks good, no foundation work required.")
            .with_id("sample-1"),
        Task::new("Finish bridge in Tacoma", "Found awesome girders at half the cost!")
            .with_id("sample-2"),
    ]
}
