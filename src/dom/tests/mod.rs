mod cascade_tests;
mod page_tests;
