pub mod health_route;
pub mod plant_info;
