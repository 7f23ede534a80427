// Task-Modul: Enthält alle Embassy Tasks
//
// Der Bulb-Task besitzt den Treiber, alle anderen schicken Kommandos
// über den Embassy Channel.

pub mod bulb;

// Re-export Tasks für einfachen Import
pub use bulb::bulb_task;
