pub mod convert_data;
pub mod convert_traj;
pub mod create_sio2;
pub mod inspect;
