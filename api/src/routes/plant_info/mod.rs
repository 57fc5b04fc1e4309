pub mod plant_info_request;
pub mod plant_info_route;
