//! Unit catalogue and movement model

pub mod movement;
pub mod unit_type;

pub use movement::{
    boost_from_percent, field_time, field_time_by_name, group_field_time, group_travel_minutes,
    minutes_to_duration, slowest_unit, SpeedParams,
};
pub use unit_type::UnitKind;
