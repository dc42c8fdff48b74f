pub mod export;
pub mod forecast;
pub mod openweather;
pub mod youtube;
