//! Export boundary towards external planning tools

pub mod plan;

pub use plan::{build_plan, planner_unit_id, Plan, PlanItem, VillageIndex, ITEM_UNIT_KEYS};
