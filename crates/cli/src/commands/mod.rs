pub mod amount;
pub mod approximate;
pub mod fuel;
pub mod quote;
