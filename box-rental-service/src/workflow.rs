use std::sync::Arc;

use dialogue_flow::{FlowRunner, Graph, GraphBuilder, SessionStorage};

use crate::{
    catalog::BoxCatalog,
    store::ReservationStore,
    tasks::*,
};

/// The booking dialogue: start date → end date → box → name → phone.
pub fn build_booking_workflow(
    store: Arc<dyn ReservationStore>,
    catalog: Arc<BoxCatalog>,
) -> Graph<BookingDraft> {
    let start_id = BookingStep::AwaitingStart.task_id();
    let end_id = BookingStep::AwaitingEnd.task_id();
    let box_id = BookingStep::AwaitingBox.task_id();
    let name_id = BookingStep::AwaitingName.task_id();
    let phone_id = BookingStep::AwaitingPhone.task_id();

    GraphBuilder::new("box_booking")
        .add_task(Arc::new(StartDateTask))
        .add_task(Arc::new(EndDateTask::new(store.clone(), catalog)))
        .add_task(Arc::new(SelectBoxTask))
        .add_task(Arc::new(RenterNameTask))
        .add_task(Arc::new(RenterPhoneTask::new(store)))
        .add_edge(start_id, end_id)
        .add_edge(end_id, box_id)
        .add_edge(box_id, name_id)
        .add_edge(name_id, phone_id)
        .build()
}

pub fn create_flow_runner(
    store: Arc<dyn ReservationStore>,
    catalog: Arc<BoxCatalog>,
    session_storage: Arc<dyn SessionStorage<BookingDraft>>,
) -> FlowRunner<BookingDraft> {
    let graph = Arc::new(build_booking_workflow(store, catalog));
    FlowRunner::new(graph, session_storage)
}
