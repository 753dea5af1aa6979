use projboard_core::view::component::Component;
use projboard_core::view::project_input::{SubmitOutcome, INVALID_INPUT_ALERT};
use projboard_core::view::project_list::{list_element_id, section_element_id, DROPPABLE_CLASS};
use projboard_core::view::surface::DropEffect;
use projboard_core::{
    AppConfig, DataTransfer, DomEvent, EventKind, MemoryDocument, ProjectBoard, ProjectState,
    ProjectStatus, RenderSurface, TRANSFER_MEDIA_TYPE,
};
use std::rc::Rc;

struct Page {
    document: Rc<MemoryDocument>,
    board: ProjectBoard,
}

fn mount_page() -> Page {
    let document = Rc::new(MemoryDocument::with_app_templates("app"));
    let surface: Rc<dyn RenderSurface> = document.clone();
    let board = ProjectBoard::mount(surface, ProjectState::shared(), &AppConfig::default())
        .expect("board should mount");
    Page { document, board }
}

impl Page {
    fn fill_form(&self, title: &str, description: &str, people: &str) {
        for (selector, value) in [
            ("title", title),
            ("description", description),
            ("people", people),
        ] {
            let field = self
                .document
                .element_by_id(selector)
                .expect("form field exists");
            self.document
                .set_input_value(field, value)
                .expect("set field value");
        }
    }

    fn field(&self, id: &str) -> String {
        let field = self.document.element_by_id(id).expect("form field exists");
        self.document.input_value(field).expect("read field value")
    }

    fn submit(&self) -> DomEvent {
        let mut event = DomEvent::new(EventKind::Submit);
        self.document
            .dispatch_to("user-input", &mut event)
            .expect("dispatch submit");
        event
    }

    fn rendered_titles(&self, bucket: ProjectStatus) -> Vec<String> {
        let list = self
            .document
            .element_by_id(&list_element_id(bucket))
            .expect("list exists");
        self.document
            .children(list)
            .into_iter()
            .map(|item| {
                let heading = self.document.query(item, "h2").expect("item heading");
                self.document.text(heading).expect("heading text")
            })
            .collect()
    }

    fn drag_start(&self, project_id: &str) -> DataTransfer {
        let mut event = DomEvent::new(EventKind::DragStart);
        self.document
            .dispatch_to(project_id, &mut event)
            .expect("dispatch dragstart");
        event.into_data_transfer().expect("dragstart fills a transfer")
    }

    fn drag_to(&self, bucket: ProjectStatus, kind: EventKind, transfer: DataTransfer) -> DomEvent {
        let mut event = DomEvent::drag(kind, transfer);
        self.document
            .dispatch_to(&section_element_id(bucket), &mut event)
            .expect("dispatch drag event");
        event
    }

    fn list_is_droppable(&self, bucket: ProjectStatus) -> bool {
        let list = self
            .document
            .element_by_id(&list_element_id(bucket))
            .expect("list exists");
        self.document.has_class(list, DROPPABLE_CLASS)
    }
}

#[test]
fn mount_attaches_form_then_both_lists() {
    let page = mount_page();
    let host = page.document.element_by_id("app").expect("host exists");
    let ids = page
        .document
        .children(host)
        .into_iter()
        .map(|node| page.document.element_id(node).unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["user-input", "active-projects", "finished-projects"]);

    let heading = page
        .document
        .query(
            page.document
                .element_by_id("finished-projects")
                .expect("finished section"),
            "h2",
        )
        .expect("section heading");
    assert_eq!(
        page.document.text(heading).as_deref(),
        Some("FINISHED PROJECTS")
    );
    assert!(page.rendered_titles(ProjectStatus::Active).is_empty());
}

#[test]
fn views_expose_their_mounted_elements() {
    let page = mount_page();
    let host = page.document.element_by_id("app").expect("host exists");
    let form = page.board.input();
    assert_eq!(form.mounted().host(), host);
    assert_eq!(page.document.element_id(form.element()).as_deref(), Some("user-input"));
    let finished = page.board.list(ProjectStatus::Finished);
    assert_eq!(
        page.document.element_id(finished.element()).as_deref(),
        Some("finished-projects")
    );
}

#[test]
fn valid_submission_adds_project_and_clears_fields() {
    let page = mount_page();
    page.fill_form("Build API", "Design and implement REST endpoints", "3");

    let event = page.submit();
    assert!(event.default_prevented());
    assert_eq!(page.board.store().len(), 1);
    assert_eq!(page.rendered_titles(ProjectStatus::Active), vec!["Build API"]);
    assert!(page.rendered_titles(ProjectStatus::Finished).is_empty());
    for field in ["title", "description", "people"] {
        assert_eq!(page.field(field), "");
    }
    assert!(page.document.alerts().is_empty());
}

#[test]
fn invalid_submission_alerts_and_keeps_fields() {
    let page = mount_page();
    page.fill_form("Build API", "tiny", "3");

    let outcome = page.board.input().submit().expect("submit runs");
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(page.board.store().is_empty());
    assert_eq!(page.document.alerts(), vec![INVALID_INPUT_ALERT]);
    assert_eq!(page.field("description"), "tiny");
    assert_eq!(page.field("people"), "3");
}

#[test]
fn item_renders_title_headcount_and_description() {
    let page = mount_page();
    let id = page
        .board
        .store()
        .add_project("Solo", "one person job", 1);

    let item = page
        .document
        .element_by_id(id.as_str())
        .expect("item element uses project id");
    let text_of = |selector: &str| {
        let node = page.document.query(item, selector).expect("item slot");
        page.document.text(node).expect("slot text")
    };
    assert_eq!(text_of("h2"), "Solo");
    assert_eq!(text_of("h3"), "1 person assigned");
    assert_eq!(text_of("p"), "one person job");
}

#[test]
fn finished_bucket_renders_only_finished_in_insertion_order() {
    let page = mount_page();
    let store = page.board.store();
    let ids = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|title| store.add_project(*title, "bucket filtering", 2))
        .collect::<Vec<_>>();
    for index in [4, 0, 2] {
        store.move_project(ids[index].as_str(), ProjectStatus::Finished);
    }

    assert_eq!(
        page.rendered_titles(ProjectStatus::Finished),
        vec!["a", "c", "e"]
    );
    assert_eq!(page.rendered_titles(ProjectStatus::Active), vec!["b", "d"]);
    let finished = page.board.list(ProjectStatus::Finished);
    assert_eq!(finished.assigned_projects().len(), 3);
    assert_eq!(
        finished.rendered_ids(),
        vec![ids[0].clone(), ids[2].clone(), ids[4].clone()]
    );
}

#[test]
fn drag_and_drop_moves_project_between_lists() {
    let page = mount_page();
    let id = page
        .board
        .store()
        .add_project("Build API", "Design and implement REST endpoints", 3);

    let transfer = page.drag_start(id.as_str());
    assert_eq!(transfer.types(), vec![TRANSFER_MEDIA_TYPE]);
    assert_eq!(transfer.get_data(TRANSFER_MEDIA_TYPE), id.as_str());
    assert_eq!(transfer.effect_allowed(), Some(DropEffect::Move));

    let over = page.drag_to(ProjectStatus::Finished, EventKind::DragOver, transfer.clone());
    assert!(over.default_prevented());
    assert!(page.list_is_droppable(ProjectStatus::Finished));

    page.drag_to(ProjectStatus::Finished, EventKind::Drop, transfer);
    assert!(!page.list_is_droppable(ProjectStatus::Finished));
    assert!(page.rendered_titles(ProjectStatus::Active).is_empty());
    assert_eq!(
        page.rendered_titles(ProjectStatus::Finished),
        vec!["Build API"]
    );

    // The re-rendered item is draggable back.
    let transfer = page.drag_start(id.as_str());
    page.drag_to(ProjectStatus::Active, EventKind::Drop, transfer);
    assert_eq!(
        page.rendered_titles(ProjectStatus::Active),
        vec!["Build API"]
    );
}

#[test]
fn dragover_ignores_foreign_payloads() {
    let page = mount_page();
    let mut transfer = DataTransfer::new();
    transfer.set_data("text/html", "<li>x</li>");

    let over = page.drag_to(ProjectStatus::Active, EventKind::DragOver, transfer);
    assert!(!over.default_prevented());
    assert!(!page.list_is_droppable(ProjectStatus::Active));
}

#[test]
fn dragleave_clears_drop_marker() {
    let page = mount_page();
    let mut transfer = DataTransfer::new();
    transfer.set_data(TRANSFER_MEDIA_TYPE, "whatever");

    page.drag_to(ProjectStatus::Active, EventKind::DragOver, transfer.clone());
    assert!(page.list_is_droppable(ProjectStatus::Active));
    page.drag_to(ProjectStatus::Active, EventKind::DragLeave, transfer);
    assert!(!page.list_is_droppable(ProjectStatus::Active));
}

#[test]
fn stale_drop_payload_is_silently_ignored() {
    let page = mount_page();
    page.board.store().add_project("Stay", "should not move", 2);
    let mut transfer = DataTransfer::new();
    transfer.set_data(TRANSFER_MEDIA_TYPE, "stale-id");

    page.drag_to(ProjectStatus::Finished, EventKind::Drop, transfer);
    assert_eq!(page.rendered_titles(ProjectStatus::Active), vec!["Stay"]);
    assert!(page.rendered_titles(ProjectStatus::Finished).is_empty());
    assert!(page.document.alerts().is_empty());
}

#[test]
fn dropping_onto_own_bucket_keeps_rendering() {
    let page = mount_page();
    let id = page.board.store().add_project("Here", "already active", 1);
    let before = page.board.list(ProjectStatus::Active).rendered_ids();

    let transfer = page.drag_start(id.as_str());
    page.drag_to(ProjectStatus::Active, EventKind::Drop, transfer);
    assert_eq!(page.board.list(ProjectStatus::Active).rendered_ids(), before);
}

#[test]
fn repeated_renders_keep_document_bounded() {
    let page = mount_page();
    let mounted_nodes = page.document.node_count();
    let store = page.board.store();
    let ids = (0..100)
        .map(|index| store.add_project(format!("p{index}"), "bounded arena", 2))
        .collect::<Vec<_>>();
    for id in ids.iter().step_by(3) {
        store.move_project(id.as_str(), ProjectStatus::Finished);
    }

    // Each visible item is an li with h2, h3 and p.
    assert_eq!(page.document.node_count(), mounted_nodes + 100 * 4);
    assert_eq!(page.rendered_titles(ProjectStatus::Finished).len(), 34);
    assert_eq!(page.rendered_titles(ProjectStatus::Active).len(), 66);
}
