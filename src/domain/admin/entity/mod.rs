pub mod system_setting;
