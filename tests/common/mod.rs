// Shared fixtures for the headless sortable tests

#![allow(dead_code)]

use indextree::NodeId;
use sortable_wasm::dom::{Dom, MemoryDom, MemoryDragEvent};
use sortable_wasm::{DataRecord, DropInfo, PlaceholderPosition, SortableCallbacks, SortableOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct DropCall {
    pub item: NodeId,
    pub previous: Option<NodeId>,
    pub data: DataRecord,
    pub previous_data: Option<DataRecord>,
    pub next: Option<NodeId>,
}

impl DropCall {
    fn from_info(info: &DropInfo<'_, NodeId>) -> Self {
        Self {
            item: *info.item,
            previous: info.previous.copied(),
            data: info.data.clone(),
            previous_data: info.previous_data.cloned(),
            next: info.next.copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Pickup {
        item: NodeId,
        data: DataRecord,
        previous: Option<NodeId>,
        next: Option<NodeId>,
    },
    Drag {
        item: NodeId,
        below: NodeId,
        position: PlaceholderPosition,
    },
    BeforeDrop(DropCall),
    Drop(DropCall),
}

/// Records every callback; `veto` makes `before_drop` return `false`
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub veto: bool,
}

impl Recorder {
    pub fn vetoing() -> Self {
        Self {
            calls: Vec::new(),
            veto: true,
        }
    }

    pub fn pickups(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Pickup { .. }))
            .collect()
    }

    pub fn drags(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Drag { .. }))
            .count()
    }

    pub fn drops(&self) -> Vec<&DropCall> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Drop(drop) => Some(drop),
                _ => None,
            })
            .collect()
    }
}

impl SortableCallbacks<MemoryDom> for Recorder {
    fn pickup(
        &mut self,
        item: &NodeId,
        data: &DataRecord,
        previous: Option<&NodeId>,
        next: Option<&NodeId>,
    ) {
        self.calls.push(Call::Pickup {
            item: *item,
            data: data.clone(),
            previous: previous.copied(),
            next: next.copied(),
        });
    }

    fn drag(
        &mut self,
        _event: &MemoryDragEvent,
        item: &NodeId,
        below: &NodeId,
        position: PlaceholderPosition,
    ) {
        self.calls.push(Call::Drag {
            item: *item,
            below: *below,
            position,
        });
    }

    fn before_drop(&mut self, drop: &DropInfo<'_, NodeId>) -> bool {
        self.calls.push(Call::BeforeDrop(DropCall::from_info(drop)));
        !self.veto
    }

    fn drop(&mut self, drop: &DropInfo<'_, NodeId>) {
        self.calls.push(Call::Drop(DropCall::from_info(drop)));
    }
}

pub struct ListFixture {
    pub dom: MemoryDom,
    pub list: NodeId,
    pub items: Vec<NodeId>,
}

/// `<ul>` under the body with one `<li data-id=label>` per label
pub fn list(labels: &[&str]) -> ListFixture {
    let dom = MemoryDom::new();
    let list = dom.append_element(dom.body_node(), "ul");
    let items = labels
        .iter()
        .map(|label| {
            let li = dom.append_element(list, "li");
            dom.set_attribute(&li, "data-id", label).unwrap();
            dom.append_text(&li, label).unwrap();
            dom.set_size(li, 200.0, 24.0);
            li
        })
        .collect();
    ListFixture { dom, list, items }
}

/// Defaults plus the `id` data field
pub fn options() -> SortableOptions {
    SortableOptions {
        data_attributes: vec!["id".to_string()],
        ..SortableOptions::default()
    }
}

pub fn event(target: NodeId, client_y: f64) -> MemoryDragEvent {
    MemoryDragEvent::new(target, client_y)
}

pub fn record(id: &str) -> DataRecord {
    std::iter::once(("id".to_string(), Some(id.to_string()))).collect()
}
