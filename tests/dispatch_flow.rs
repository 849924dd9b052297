//! End-to-end dispatch flow against a temp-dir persona store.

use std::sync::Arc;

use persona_mcp::dispatcher::{Dispatcher, RecommendOverrides};
use persona_mcp::repository::{FilePersonaRepository, PersonaRepository};
use tempfile::TempDir;

fn dispatcher() -> (TempDir, Arc<dyn PersonaRepository>, Dispatcher) {
    let dir = TempDir::new().unwrap();
    let repository: Arc<dyn PersonaRepository> =
        Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
    let dispatcher = Dispatcher::new(repository.clone(), None, None);
    (dir, repository, dispatcher)
}

#[tokio::test]
async fn confident_selection_uses_the_catalogue() {
    let (_dir, _repo, dispatcher) = dispatcher();

    let selection = dispatcher
        .select("debug Python code with machine learning algorithms", None)
        .await
        .unwrap();

    assert!(!selection.auto_generated);
    let selected = selection.selected.unwrap();
    assert_eq!(selected.persona.id, "tech_expert");
    assert!(selected.confidence >= 0.3);
    assert!(selection.alternatives.len() <= 2);
}

#[tokio::test]
async fn low_confidence_selection_synthesizes_and_persists() {
    let dir = TempDir::new().unwrap();
    let task = "analyze cryptocurrency market trends";
    let generated_id;

    {
        let repository: Arc<dyn PersonaRepository> =
            Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
        let dispatcher = Dispatcher::new(repository.clone(), None, None);

        let selection = dispatcher.select(task, None).await.unwrap();
        assert!(selection.auto_generated);
        assert_eq!(selection.confidence, 1.0);

        let selected = selection.selected.unwrap();
        assert!(selected.persona.auto_generated);
        generated_id = selected.persona.id.clone();

        let generated = dispatcher.list_generated().unwrap();
        assert_eq!(generated.len(), 1);
        let reason = generated[0].generation_reason.clone().unwrap();
        assert!(reason.contains(task));
    }

    // The synthesized persona survives a store reopen.
    let reopened = FilePersonaRepository::open(dir.path()).unwrap();
    let persisted = reopened.get(&generated_id).unwrap().unwrap();
    assert!(persisted.auto_generated);
    assert_eq!(persisted.original_task.as_deref(), Some(task));
}

#[tokio::test]
async fn deleting_the_selected_persona_clears_the_slot() {
    let (_dir, repository, dispatcher) = dispatcher();

    dispatcher
        .select("debug Python code with machine learning algorithms", None)
        .await
        .unwrap();
    let current = dispatcher.current_persona().unwrap();
    assert_eq!(current.id, "tech_expert");

    repository.delete(&current.id).unwrap();
    dispatcher.clear_if_current(&current.id);
    assert!(dispatcher.current_persona().is_none());

    // The next selection repopulates the slot from what is left.
    dispatcher
        .select("write a short story about a lighthouse", None)
        .await
        .unwrap();
    assert!(dispatcher.current_persona().is_some());
}

#[tokio::test]
async fn threshold_boundary_controls_generation() {
    let (_dir, _repo, dispatcher) = dispatcher();
    let task = "debug Python code with machine learning algorithms";

    // Confidence 0.575 clears the default threshold; no synthesis.
    let selection = dispatcher.select(task, None).await.unwrap();
    assert!(!selection.auto_generated);

    // A maximal threshold forces synthesis even for the same task.
    dispatcher.set_confidence_threshold(1.0).unwrap();
    let forced = dispatcher.select(task, None).await.unwrap();
    assert!(forced.auto_generated);
    assert_eq!(dispatcher.list_generated().unwrap().len(), 1);
}

#[tokio::test]
async fn recommendation_never_mutates_the_catalogue() {
    let (_dir, repository, dispatcher) = dispatcher();

    let (analysis, ranked) = dispatcher
        .recommend(
            "analyze cryptocurrency market trends",
            None,
            RecommendOverrides::default(),
        )
        .unwrap();

    assert_eq!(analysis.domain.as_str(), "finance");
    assert!(!ranked.is_empty());
    assert_eq!(repository.list_all().unwrap().len(), 4);
    assert!(dispatcher.list_generated().unwrap().is_empty());
    assert!(dispatcher.current_persona().is_none());
}
