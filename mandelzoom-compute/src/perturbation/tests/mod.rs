mod helpers;

mod series;
