//! Unit tests for the report model.

use super::*;
use crate::store::AttachmentRef;

#[test]
fn start_step_records_child_in_parent() {
    let test = Test::new("checkout");
    let outer = test.start_step("outer");
    let inner = outer.start_step("inner");
    inner.set_status(Status::Passed);

    let record = test.record();
    let Some(outer_record) = record.step("outer") else {
        panic!("outer step should be recorded on the test");
    };
    let Some(inner_record) = outer_record.step("inner") else {
        panic!("inner step should be recorded on the outer step");
    };
    assert_eq!(inner_record.status, Some(Status::Passed));
    assert_eq!(inner_record.stage, Stage::Running);
}

#[test]
fn step_end_is_idempotent() {
    let step = Step::new("idempotent");
    assert_eq!(step.stage(), Stage::Running);
    assert!(step.end());
    let first_stop = step.record().stop;
    assert!(first_stop.is_some());
    assert!(!step.end());
    assert_eq!(step.record().stop, first_stop);
}

#[test]
fn clones_share_state() {
    let step = Step::new("shared");
    let clone = step.clone();
    clone.add_parameter(Parameter::new("user", "alice"));
    assert!(step.is_same(&clone));
    assert!(!step.is_same(&Step::new("shared")));
    assert_eq!(step.record().parameters, vec![Parameter::new("user", "alice")]);
}

#[test]
fn test_records_metadata_in_insertion_order() {
    let test = Test::new("metadata");
    test.add_label(Label::new("epic", "billing"));
    test.add_label(Label::new("epic", "payments").with_index(1));
    test.add_link(Link::new("https://issues/42", "42", LinkType::Issue));
    test.add_attachment(Attachment::new(
        "log",
        ContentType::Text,
        AttachmentRef::new("1-attachment.txt"),
    ));
    test.set_status(Status::Broken);
    test.set_status_details(StatusDetails::new("connection reset"));
    test.set_description_html("<b>bold</b>");

    let record = test.record();
    assert_eq!(record.label_values("epic"), ["billing", "payments"]);
    assert_eq!(record.labels.last().and_then(|label| label.index), Some(1));
    assert_eq!(record.links.len(), 1);
    assert_eq!(record.attachments.len(), 1);
    assert_eq!(record.status, Some(Status::Broken));
    assert_eq!(
        record
            .status_details
            .and_then(|details| details.message),
        Some(String::from("connection reset"))
    );
    assert_eq!(record.description_html.as_deref(), Some("<b>bold</b>"));
    assert!(record.description.is_none());
}

#[test]
fn root_collects_calls_like_any_executable() {
    let root = RootExecutable::new("suite hooks");
    assert_eq!(root.name(), "suite hooks");
    root.add_link(Link::new("https://docs", "docs", LinkType::Custom));
    let step = root.start_step("seed database");
    assert!(step.end());
    let record = root.record();
    assert_eq!(record.links.len(), 1);
    assert_eq!(
        record.step("seed database").map(|step| step.stage),
        Some(Stage::Finished)
    );
}

#[test]
fn executables_work_as_trait_objects() {
    let executables: Vec<Box<dyn Executable>> = vec![
        Box::new(Test::new("test")),
        Box::new(Step::new("step")),
        Box::new(RootExecutable::new("root")),
    ];
    let names: Vec<String> = executables.iter().map(|item| item.name()).collect();
    assert_eq!(names, ["test", "step", "root"]);
}

#[test]
fn status_and_link_type_names() {
    assert_eq!(Status::Broken.as_str(), "broken");
    assert_eq!(LinkType::Custom.as_str(), "link");
    assert_eq!(LinkType::Tms.as_str(), "tms");
}

#[cfg(feature = "json")]
#[test]
fn records_serialize_with_report_field_names() {
    let test = Test::new("serialised");
    test.set_full_name("suite::serialised");
    test.add_link(Link::new("https://tms/7", "7", LinkType::Tms));
    test.add_attachment(Attachment::new(
        "shot",
        ContentType::Png,
        AttachmentRef::new("1-attachment.png"),
    ));
    test.set_status(Status::Passed);

    let value = match serde_json::to_value(test.record()) {
        Ok(value) => value,
        Err(error) => panic!("record should serialize: {error}"),
    };
    assert_eq!(value["fullName"], "suite::serialised");
    assert_eq!(value["status"], "passed");
    assert_eq!(value["stage"], "running");
    assert_eq!(value["links"][0]["type"], "tms");
    assert_eq!(value["attachments"][0]["type"], "image/png");
    assert_eq!(value["attachments"][0]["source"], "1-attachment.png");
    assert!(value.get("stop").is_none());
}
