mod helpers;

mod test_exec;
mod test_init;
mod test_resolve;
mod test_run;
mod test_segments;
